use crate::{
    domain::{SubscriberEmail, Subscription, SubscriptionToken, WeatherData},
    email_client::{EmailClient, EmailMessage},
};
use askama::Template;
use secrecy::ExposeSecret;

/// Builds the messages subscribers receive and hands them to the provider.
#[derive(Clone)]
pub struct EmailSender {
    email_client: EmailClient,
    sender: SubscriberEmail,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum EmailSenderError {
    #[error("Failed to send confirmation email")]
    Confirmation(#[source] reqwest::Error),
    #[error("Failed to send weather update")]
    WeatherUpdate(#[source] reqwest::Error),
    #[error("Failed to render email")]
    Rendering(#[from] askama::Error),
}

impl EmailSender {
    pub fn new(email_client: EmailClient, sender: SubscriberEmail, base_url: String) -> Self {
        Self {
            email_client,
            sender,
            base_url,
        }
    }

    #[tracing::instrument(name = "Send a confirmation email", skip(self, token))]
    pub async fn send_confirmation_email(
        &self,
        to: &SubscriberEmail,
        token: &SubscriptionToken,
    ) -> Result<(), EmailSenderError> {
        let confirmation_link = self.link("confirm", token);
        let message = EmailMessage {
            from: self.sender.clone(),
            to: to.clone(),
            subject: "Confirm Your Weather Subscription".into(),
            text_body: format!(
                "Please confirm your subscription by clicking the link: {confirmation_link}"
            ),
            html_body: ConfirmationEmail {
                confirmation_link: &confirmation_link,
            }
            .render()?,
        };

        self.email_client
            .send(&message)
            .await
            .map_err(EmailSenderError::Confirmation)?;

        tracing::info!("Confirmation email sent");
        Ok(())
    }

    #[tracing::instrument(
        name = "Send a weather update",
        skip(self, subscription, weather),
        fields(subscriber_email = %subscription.email, city = %subscription.city)
    )]
    pub async fn send_weather_update(
        &self,
        subscription: &Subscription,
        weather: &WeatherData,
    ) -> Result<(), EmailSenderError> {
        let city = &subscription.city;
        let unsubscribe_link = self.link("unsubscribe", &subscription.token);
        let summary = format!(
            "{}, temperature {:.1}°C, humidity {:.0}%",
            weather.description, weather.temperature, weather.humidity
        );
        let message = EmailMessage {
            from: self.sender.clone(),
            to: subscription.email.clone(),
            subject: format!("Weather update for {city}"),
            text_body: format!(
                "Current weather in {city}: {summary}.\n\nUnsubscribe: {unsubscribe_link}"
            ),
            html_body: WeatherUpdateEmail {
                city: city.as_ref(),
                summary: &summary,
                unsubscribe_link: &unsubscribe_link,
            }
            .render()?,
        };

        self.email_client
            .send(&message)
            .await
            .map_err(EmailSenderError::WeatherUpdate)
    }

    fn link(&self, action: &str, token: &SubscriptionToken) -> String {
        format!(
            "{}/{action}/{}",
            self.base_url.trim_end_matches('/'),
            token.expose_secret()
        )
    }
}

/// Links are built from the configured base URL and a generated token.
/// Everything else is escaped.
#[derive(Template)]
#[template(path = "email/confirmation.html")]
struct ConfirmationEmail<'a> {
    confirmation_link: &'a str,
}

#[derive(Template)]
#[template(path = "email/weather_update.html")]
struct WeatherUpdateEmail<'a> {
    city: &'a str,
    summary: &'a str,
    unsubscribe_link: &'a str,
}
