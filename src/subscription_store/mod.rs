mod in_memory;
mod postgres;

pub use in_memory::InMemorySubscriptionStore;
pub use postgres::PostgresSubscriptionStore;

use crate::domain::{NewSubscription, Subscription, SubscriptionToken};
use axum::async_trait;
use time::OffsetDateTime;

/// Outcome of a confirmation attempt, decided atomically by the store.
#[derive(Debug, PartialEq)]
pub enum Confirmation {
    Confirmed,
    AlreadyConfirmed,
    TokenNotFound,
}

#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    #[error("Email already subscribed")]
    EmailTaken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Persistence for subscriptions. Implementations own the uniqueness of
/// emails and tokens and make `confirm` a single check-and-set.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn insert_pending(
        &self,
        subscription: &NewSubscription,
        token: &SubscriptionToken,
    ) -> Result<(), InsertError>;

    async fn confirm(&self, token: &SubscriptionToken) -> Result<Confirmation, anyhow::Error>;

    /// Returns `false` when no subscription holds the token.
    async fn remove(&self, token: &SubscriptionToken) -> Result<bool, anyhow::Error>;

    /// Picks the confirmed subscription that has waited longest for an update
    /// at `now` and records `now` as its last update in the same step. A
    /// claimed subscription is not handed out again until its period elapses.
    async fn claim_due_update(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<Subscription>, anyhow::Error>;
}
