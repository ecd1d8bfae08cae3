use super::{City, Frequency, SubscriberEmail, ValidationErrors};
use serde::Deserialize;
use serde_json::Value;

/// Subscribe request body as received. Fields are kept as raw JSON so that a
/// value of the wrong type is reported next to the other violations instead
/// of failing the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionRequest {
    pub email: Option<Value>,
    pub city: Option<Value>,
    pub frequency: Option<Value>,
}

#[derive(Debug)]
pub struct NewSubscription {
    pub email: SubscriberEmail,
    pub city: City,
    pub frequency: Frequency,
}

impl TryFrom<SubscriptionRequest> for NewSubscription {
    type Error = ValidationErrors;

    fn try_from(request: SubscriptionRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::default();

        let email = text(request.email, SubscriberEmail::REQUIRED, SubscriberEmail::INVALID)
            .and_then(SubscriberEmail::parse)
            .map_err(|e| errors.push(e))
            .ok();
        let city = text(request.city, City::REQUIRED, City::NOT_TEXT)
            .and_then(City::parse)
            .map_err(|e| errors.push(e))
            .ok();
        let frequency = text(request.frequency, Frequency::REQUIRED, Frequency::INVALID)
            .and_then(Frequency::try_from)
            .map_err(|e| errors.push(e))
            .ok();

        match (email, city, frequency) {
            (Some(email), Some(city), Some(frequency)) => Ok(Self {
                email,
                city,
                frequency,
            }),
            _ => Err(errors),
        }
    }
}

fn text(value: Option<Value>, required: &str, not_text: &str) -> Result<String, String> {
    match value {
        None | Some(Value::Null) => Err(required.into()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(not_text.into()),
    }
}
