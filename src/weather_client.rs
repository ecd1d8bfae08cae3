use crate::domain::{City, WeatherData};
use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

/// Client for the WeatherAPI.com `current.json` endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

impl WeatherClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url,
            api_key,
        })
    }

    #[tracing::instrument(name = "Fetch current weather", skip(self))]
    pub async fn get_weather(&self, city: &City) -> Result<WeatherData, anyhow::Error> {
        let url = format!("{}/v1/current.json", &self.base_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.expose_secret().as_str()),
                ("q", city.as_ref()),
                ("aqi", "no"),
            ])
            .send()
            .await
            .context("Failed to send request to the weather provider")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!(
                "Weather provider responded with status {status}: {}",
                truncate_body(&body)
            );
        }

        let parsed: CurrentResponse = response
            .json()
            .await
            .context("Failed to parse the weather provider response")?;

        Ok(WeatherData {
            temperature: parsed.current.temp_c,
            humidity: parsed.current.humidity,
            description: parsed.current.condition.text,
        })
    }
}

#[derive(Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Deserialize)]
struct Current {
    temp_c: f64,
    humidity: f64,
    condition: Condition,
}

#[derive(Deserialize)]
struct Condition {
    text: String,
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}
