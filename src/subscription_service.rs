use crate::{
    domain::{NewSubscription, SubscriptionToken},
    email_sender::EmailSender,
    subscription_store::{Confirmation, InsertError, SubscriptionStore},
};
use anyhow::Context;

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("Token not found")]
    TokenNotFound,
    #[error("Already confirmed")]
    AlreadyConfirmed,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Stores a pending subscription and mails its confirmation link. The token
/// is returned so the caller can surface it.
#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(store, email_sender, new_subscription),
    fields(
        subscriber_email = %new_subscription.email,
        subscriber_city = %new_subscription.city
    )
)]
pub async fn subscribe(
    store: &dyn SubscriptionStore,
    email_sender: &EmailSender,
    new_subscription: NewSubscription,
) -> Result<SubscriptionToken, SubscriptionError> {
    let token = SubscriptionToken::generate();

    store
        .insert_pending(&new_subscription, &token)
        .await
        .map_err(|e| match e {
            InsertError::EmailTaken => SubscriptionError::AlreadySubscribed,
            InsertError::UnexpectedError(e) => SubscriptionError::UnexpectedError(e),
        })?;

    if let Err(e) = email_sender
        .send_confirmation_email(&new_subscription.email, &token)
        .await
    {
        store
            .remove(&token)
            .await
            .context("Failed to roll back a subscription without confirmation email")?;
        return Err(anyhow::Error::new(e).into());
    }

    Ok(token)
}

#[tracing::instrument(name = "Confirming a pending subscriber", skip_all)]
pub async fn confirm_subscription(
    store: &dyn SubscriptionStore,
    token: &SubscriptionToken,
) -> Result<(), SubscriptionError> {
    match store.confirm(token).await? {
        Confirmation::Confirmed => Ok(()),
        Confirmation::AlreadyConfirmed => Err(SubscriptionError::AlreadyConfirmed),
        Confirmation::TokenNotFound => Err(SubscriptionError::TokenNotFound),
    }
}

#[tracing::instrument(name = "Removing a subscriber", skip_all)]
pub async fn unsubscribe(
    store: &dyn SubscriptionStore,
    token: &SubscriptionToken,
) -> Result<(), SubscriptionError> {
    if store.remove(token).await? {
        Ok(())
    } else {
        Err(SubscriptionError::TokenNotFound)
    }
}
