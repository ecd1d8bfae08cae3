use super::{subscriptions_confirm::parse_token, ApiError, MessageResponse};
use crate::{app_state::AppState, subscription_service};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/unsubscribe", get(unsubscribe).post(unsubscribe))
        .route("/unsubscribe/:token", get(unsubscribe).post(unsubscribe))
}

#[tracing::instrument(name = "Unsubscribe", skip(app_state, token))]
async fn unsubscribe(
    State(app_state): State<AppState>,
    token: Option<Path<String>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = parse_token(token)?;

    subscription_service::unsubscribe(app_state.store.as_ref(), &token).await?;

    Ok(Json(MessageResponse {
        message: "Unsubscribed successfully",
    }))
}
