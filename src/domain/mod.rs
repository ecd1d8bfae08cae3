mod city;
mod frequency;
mod new_subscription;
mod subscriber_email;
mod subscription;
mod subscription_status;
mod subscription_token;
mod validation;
mod weather;

pub use city::City;
pub use frequency::Frequency;
pub use new_subscription::{NewSubscription, SubscriptionRequest};
pub use subscriber_email::SubscriberEmail;
pub use subscription::Subscription;
pub use subscription_status::SubscriptionStatus;
pub use subscription_token::SubscriptionToken;
pub use validation::ValidationErrors;
pub use weather::{parse_weather_city, WeatherData};
