use crate::domain::SubscriberEmail;
use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug)]
pub struct EmailMessage {
    pub from: SubscriberEmail,
    pub to: SubscriberEmail,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl EmailClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Send email", skip(self, message), fields(recipient = %message.to))]
    pub async fn send(&self, message: &EmailMessage) -> Result<(), Error> {
        let url = format!("{}/v3/mail/send", &self.base_url);
        let request_body = SendEmailRequest {
            personalizations: [Personalization {
                to: [Address {
                    email: message.to.as_ref(),
                }],
            }],
            from: Address {
                email: message.from.as_ref(),
            },
            subject: &message.subject,
            content: [
                Content {
                    kind: "text/plain",
                    value: &message.text_body,
                },
                Content {
                    kind: "text/html",
                    value: &message.html_body,
                },
            ],
        };

        self.http_client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}
