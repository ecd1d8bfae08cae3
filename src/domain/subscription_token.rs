use rand::{distributions::Alphanumeric, thread_rng, Rng};
use secrecy::{ExposeSecret, Secret};
use std::iter::repeat_with;

const TOKEN_LENGTH: usize = 25;

/// Opaque token issued on subscribe. It confirms the subscription once and
/// authorizes unsubscribing afterwards.
#[derive(Clone, Debug)]
pub struct SubscriptionToken(Secret<String>);

impl SubscriptionToken {
    pub const REQUIRED: &'static str = "Token is required";

    pub fn generate() -> Self {
        Self::generate_with_rng(&mut thread_rng())
    }

    fn generate_with_rng(rng: &mut impl Rng) -> Self {
        let token = repeat_with(|| rng.sample(Alphanumeric))
            .map(char::from)
            .take(TOKEN_LENGTH)
            .collect();

        Self(Secret::new(token))
    }

    /// Tokens are only checked for presence; an unknown token is a lookup
    /// miss, not a validation failure.
    pub fn parse(s: String) -> Result<Self, String> {
        if s.trim().is_empty() {
            Err(Self::REQUIRED.into())
        } else {
            Ok(Self(Secret::new(s)))
        }
    }
}

impl ExposeSecret<String> for SubscriptionToken {
    fn expose_secret(&self) -> &String {
        self.0.expose_secret()
    }
}
