use crate::{
    app_state::AppState, email_sender::EmailSender, subscription_store::SubscriptionStore,
    weather_client::WeatherClient,
};
use std::time::Duration;
use time::OffsetDateTime;
use tracing::Span;

pub async fn run_worker_until_stopped(app_state: AppState) -> Result<(), anyhow::Error> {
    worker_loop(
        app_state.store.as_ref(),
        &app_state.email_sender,
        &app_state.weather_client,
    )
    .await
}

async fn worker_loop(
    store: &dyn SubscriptionStore,
    email_sender: &EmailSender,
    weather_client: &WeatherClient,
) -> Result<(), anyhow::Error> {
    loop {
        match try_execute_task(store, email_sender, weather_client).await {
            Ok(ExecutionOutcome::TaskCompleted) => {}
            Ok(ExecutionOutcome::NothingDue) => tokio::time::sleep(Duration::from_secs(10)).await,
            Err(_) => tokio::time::sleep(Duration::from_secs(1)).await,
        }
    }
}

/// Delivers one weather update to the confirmed subscriber that has waited
/// longest. The subscription is claimed before delivery, so a failed fetch or
/// send is logged and still counts as sent.
#[tracing::instrument(
    skip_all,
    fields(
        subscriber_email=tracing::field::Empty,
        subscriber_city=tracing::field::Empty),
    err
)]
pub async fn try_execute_task(
    store: &dyn SubscriptionStore,
    email_sender: &EmailSender,
    weather_client: &WeatherClient,
) -> Result<ExecutionOutcome, anyhow::Error> {
    let Some(subscription) = store.claim_due_update(OffsetDateTime::now_utc()).await? else {
        return Ok(ExecutionOutcome::NothingDue);
    };

    Span::current()
        .record("subscriber_email", tracing::field::display(&subscription.email))
        .record("subscriber_city", tracing::field::display(&subscription.city));

    match weather_client.get_weather(&subscription.city).await {
        Ok(weather) => {
            if let Err(e) = email_sender.send_weather_update(&subscription, &weather).await {
                tracing::error!(
                    error_cause_chain = ?e,
                    error.message = %e,
                    "Failed to deliver weather update to a confirmed subscriber. Skipping."
                );
            }
        }
        Err(e) => {
            tracing::error!(
                error_cause_chain = ?e,
                error.message = %e,
                "Failed to fetch weather for a confirmed subscriber. Skipping."
            );
        }
    }

    Ok(ExecutionOutcome::TaskCompleted)
}

#[derive(Debug, PartialEq)]
pub enum ExecutionOutcome {
    TaskCompleted,
    NothingDue,
}
