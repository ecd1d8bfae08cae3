use super::ApiError;
use crate::{
    app_state::AppState,
    domain::{NewSubscription, SubscriptionRequest, ValidationErrors},
    subscription_service,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use secrecy::ExposeSecret;
use serde::Serialize;

const MALFORMED_BODY: &str = "Request body must be a JSON object";

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}

#[tracing::instrument(name = "Subscribe", skip(app_state, body))]
async fn subscribe(
    State(app_state): State<AppState>,
    body: Result<Json<SubscriptionRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, ApiError> {
    let Json(request) = body.map_err(|e| {
        tracing::warn!(error.message = %e.body_text(), "Rejected subscribe request body");
        ValidationErrors::from(MALFORMED_BODY.to_string())
    })?;
    let new_subscription = NewSubscription::try_from(request)?;

    let token = subscription_service::subscribe(
        app_state.store.as_ref(),
        &app_state.email_sender,
        new_subscription,
    )
    .await?;

    Ok(Json(SubscribeResponse {
        message: "Subscription successful. Confirmation email sent.",
        confirmation_token: token.expose_secret().clone(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubscribeResponse {
    message: &'static str,
    confirmation_token: String,
}
