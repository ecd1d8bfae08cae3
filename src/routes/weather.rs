use super::ApiError;
use crate::{
    app_state::AppState,
    domain::{parse_weather_city, WeatherData},
};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/weather", get(get_weather))
        .route("/weather/:city", get(get_weather))
}

#[tracing::instrument(name = "Get weather", skip(app_state))]
async fn get_weather(
    State(app_state): State<AppState>,
    city: Option<Path<String>>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let city = parse_weather_city(city.map(|Path(city)| city))?;

    let weather = app_state
        .weather_client
        .get_weather(&city)
        .await
        .context("Failed to get weather data")?;

    Ok(Json(WeatherResponse {
        city: city.to_string(),
        weather,
    }))
}

#[derive(Serialize)]
struct WeatherResponse {
    city: String,
    weather: WeatherData,
}
