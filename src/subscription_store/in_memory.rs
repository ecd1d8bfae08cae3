use super::{Confirmation, InsertError, SubscriptionStore};
use crate::domain::{NewSubscription, Subscription, SubscriptionStatus, SubscriptionToken};
use anyhow::anyhow;
use axum::async_trait;
use secrecy::ExposeSecret;
use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};
use time::OffsetDateTime;
use uuid::Uuid;

/// Process-local store. Every operation runs under one lock, which makes
/// each of them atomic.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    subscriptions: Mutex<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Subscription>>, anyhow::Error> {
        self.subscriptions
            .lock()
            .map_err(|_| anyhow!("Subscription store lock is poisoned"))
    }
}

fn holds(subscription: &Subscription, token: &SubscriptionToken) -> bool {
    subscription.token.expose_secret() == token.expose_secret()
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn insert_pending(
        &self,
        subscription: &NewSubscription,
        token: &SubscriptionToken,
    ) -> Result<(), InsertError> {
        let mut subscriptions = self.lock()?;

        if subscriptions
            .values()
            .any(|s| s.email == subscription.email)
        {
            return Err(InsertError::EmailTaken);
        }
        if subscriptions.values().any(|s| holds(s, token)) {
            return Err(anyhow!("Subscription token is already in use").into());
        }

        let id = Uuid::new_v4();
        subscriptions.insert(
            id,
            Subscription {
                id,
                email: subscription.email.clone(),
                city: subscription.city.clone(),
                frequency: subscription.frequency,
                status: SubscriptionStatus::PendingConfirmation,
                token: token.clone(),
                subscribed_at: OffsetDateTime::now_utc(),
                last_update_sent_at: None,
            },
        );

        Ok(())
    }

    async fn confirm(&self, token: &SubscriptionToken) -> Result<Confirmation, anyhow::Error> {
        let mut subscriptions = self.lock()?;

        let outcome = match subscriptions.values_mut().find(|s| holds(s, token)) {
            None => Confirmation::TokenNotFound,
            Some(s) if s.status == SubscriptionStatus::Confirmed => Confirmation::AlreadyConfirmed,
            Some(s) => {
                s.status = SubscriptionStatus::Confirmed;
                Confirmation::Confirmed
            }
        };

        Ok(outcome)
    }

    async fn remove(&self, token: &SubscriptionToken) -> Result<bool, anyhow::Error> {
        let mut subscriptions = self.lock()?;
        let before = subscriptions.len();
        subscriptions.retain(|_, s| !holds(s, token));

        Ok(subscriptions.len() < before)
    }

    async fn claim_due_update(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<Subscription>, anyhow::Error> {
        let mut subscriptions = self.lock()?;

        let claimed = subscriptions
            .values_mut()
            .filter(|s| s.is_due(now))
            .min_by_key(|s| (s.last_update_sent_at, s.subscribed_at))
            .map(|s| {
                s.last_update_sent_at = Some(now);
                s.clone()
            });

        Ok(claimed)
    }
}
