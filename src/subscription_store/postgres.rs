use super::{Confirmation, InsertError, SubscriptionStore};
use crate::domain::{
    City, Frequency, NewSubscription, SubscriberEmail, Subscription, SubscriptionStatus,
    SubscriptionToken,
};
use anyhow::{anyhow, Context};
use axum::async_trait;
use secrecy::ExposeSecret;
use sqlx::{FromRow, PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

const EMAIL_UNIQUE_CONSTRAINT: &str = "subscriptions_email_key";

pub struct PostgresSubscriptionStore {
    db_pool: PgPool,
}

impl PostgresSubscriptionStore {
    pub fn new(db_pool: PgPool) -> Self {
        Self { db_pool }
    }

    #[tracing::instrument(name = "Run database migrations", skip(self))]
    pub async fn migrate(&self) -> Result<(), anyhow::Error> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Failed to migrate the database")
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    #[tracing::instrument(name = "Save new subscription", skip_all)]
    async fn insert_pending(
        &self,
        subscription: &NewSubscription,
        token: &SubscriptionToken,
    ) -> Result<(), InsertError> {
        let result = sqlx::query(
            r#"
            INSERT INTO subscriptions
                (id, email, city, frequency, status, subscription_token, subscribed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subscription.email.as_ref())
        .bind(subscription.city.as_ref())
        .bind(subscription.frequency.as_ref())
        .bind(SubscriptionStatus::PendingConfirmation.as_ref())
        .bind(token.expose_secret())
        .bind(OffsetDateTime::now_utc())
        .execute(&self.db_pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e))
                if e.is_unique_violation() && e.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) =>
            {
                Err(InsertError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("Failed to insert new subscription")
                .into()),
        }
    }

    #[tracing::instrument(name = "Confirm subscription by token", skip_all)]
    async fn confirm(&self, token: &SubscriptionToken) -> Result<Confirmation, anyhow::Error> {
        let mut transaction = self
            .db_pool
            .begin()
            .await
            .context("Failed to begin transaction")?;

        let row = sqlx::query(
            r#"
            SELECT id, status FROM subscriptions
            WHERE subscription_token = $1
            FOR UPDATE
            "#,
        )
        .bind(token.expose_secret())
        .fetch_optional(&mut *transaction)
        .await
        .context("Failed to fetch subscription by token")?;

        let Some(row) = row else {
            return Ok(Confirmation::TokenNotFound);
        };

        let id: Uuid = row.try_get("id").context("Failed to read subscription id")?;
        let status = SubscriptionStatus::try_from(
            row.try_get::<String, _>("status")
                .context("Failed to read subscription status")?,
        )
        .map_err(|e| anyhow!(e))?;

        if status == SubscriptionStatus::Confirmed {
            return Ok(Confirmation::AlreadyConfirmed);
        }

        sqlx::query(r#"UPDATE subscriptions SET status = $1 WHERE id = $2"#)
            .bind(SubscriptionStatus::Confirmed.as_ref())
            .bind(id)
            .execute(&mut *transaction)
            .await
            .context("Failed to update subscription status")?;

        transaction
            .commit()
            .await
            .context("Failed to commit transaction")?;

        Ok(Confirmation::Confirmed)
    }

    #[tracing::instrument(name = "Delete subscription by token", skip_all)]
    async fn remove(&self, token: &SubscriptionToken) -> Result<bool, anyhow::Error> {
        let result = sqlx::query(r#"DELETE FROM subscriptions WHERE subscription_token = $1"#)
            .bind(token.expose_secret())
            .execute(&self.db_pool)
            .await
            .context("Failed to delete subscription")?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(name = "Claim next due weather update", skip(self))]
    async fn claim_due_update(
        &self,
        now: OffsetDateTime,
    ) -> Result<Option<Subscription>, anyhow::Error> {
        let record = sqlx::query_as::<_, SubscriptionRecord>(
            r#"
            UPDATE subscriptions
            SET last_update_sent_at = $1
            WHERE id = (
                SELECT id FROM subscriptions
                WHERE status = $2 AND (
                    last_update_sent_at IS NULL OR
                    (frequency = $3 AND last_update_sent_at <= $4) OR
                    (frequency = $5 AND last_update_sent_at <= $6)
                )
                ORDER BY last_update_sent_at ASC NULLS FIRST, subscribed_at ASC
                LIMIT 1
                FOR UPDATE
                SKIP LOCKED
            )
            RETURNING id, email, city, frequency, status, subscription_token,
                      subscribed_at, last_update_sent_at
            "#,
        )
        .bind(now)
        .bind(SubscriptionStatus::Confirmed.as_ref())
        .bind(Frequency::Hourly.as_ref())
        .bind(now - Frequency::Hourly.period())
        .bind(Frequency::Daily.as_ref())
        .bind(now - Frequency::Daily.period())
        .fetch_optional(&self.db_pool)
        .await
        .context("Failed to claim due subscription")?;

        record.map(Subscription::try_from).transpose()
    }
}

#[derive(FromRow)]
struct SubscriptionRecord {
    id: Uuid,
    email: String,
    city: String,
    frequency: String,
    status: String,
    subscription_token: String,
    subscribed_at: OffsetDateTime,
    last_update_sent_at: Option<OffsetDateTime>,
}

impl TryFrom<SubscriptionRecord> for Subscription {
    type Error = anyhow::Error;

    fn try_from(record: SubscriptionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            email: SubscriberEmail::parse(record.email).map_err(|e| anyhow!(e))?,
            city: City::parse(record.city).map_err(|e| anyhow!(e))?,
            frequency: Frequency::try_from(record.frequency).map_err(|e| anyhow!(e))?,
            status: SubscriptionStatus::try_from(record.status).map_err(|e| anyhow!(e))?,
            token: SubscriptionToken::parse(record.subscription_token).map_err(|e| anyhow!(e))?,
            subscribed_at: record.subscribed_at,
            last_update_sent_at: record.last_update_sent_at,
        })
    }
}
