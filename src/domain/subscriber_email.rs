use validator::validate_email;

#[derive(Clone, Debug, PartialEq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub const REQUIRED: &'static str = "Email is required";
    pub const INVALID: &'static str = "Email must be a valid email address";

    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        match s {
            _ if s.trim().is_empty() => Err(Self::REQUIRED.into()),
            _ if validate_email(&s) => Ok(Self(s)),
            _ => Err(Self::INVALID.into()),
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
