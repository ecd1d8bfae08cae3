mod api_error;
pub mod health_check;
pub mod subscriptions;
pub mod subscriptions_confirm;
pub mod unsubscribe;
pub mod weather;

pub use api_error::ApiError;

use serde::Serialize;

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}
