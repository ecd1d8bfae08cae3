use crate::{
    email_sender::EmailSender, subscription_store::SubscriptionStore,
    weather_client::WeatherClient,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubscriptionStore>,
    pub email_sender: EmailSender,
    pub weather_client: WeatherClient,
}
