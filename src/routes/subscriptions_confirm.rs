use super::{ApiError, MessageResponse};
use crate::{
    app_state::AppState,
    domain::{SubscriptionToken, ValidationErrors},
    subscription_service,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/confirm", get(confirm).post(confirm))
        .route("/confirm/:token", get(confirm).post(confirm))
}

#[tracing::instrument(name = "Confirm a pending subscriber", skip(app_state, token))]
async fn confirm(
    State(app_state): State<AppState>,
    token: Option<Path<String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = parse_token(token)?;

    subscription_service::confirm_subscription(app_state.store.as_ref(), &token).await?;

    Ok(Json(MessageResponse {
        message: "Subscription confirmed successfully",
    }))
}

/// Token path parameter shared by the confirm and unsubscribe routes.
pub(super) fn parse_token(token: Option<Path<String>>) -> Result<SubscriptionToken, ValidationErrors> {
    let token = token.map(|Path(token)| token).unwrap_or_default();

    SubscriptionToken::parse(token).map_err(ValidationErrors::from)
}
