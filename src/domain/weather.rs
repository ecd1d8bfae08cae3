use super::{City, ValidationErrors};
use serde::{Deserialize, Serialize};

const CITY_PARAMETER_REQUIRED: &str = "City parameter is required";

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WeatherData {
    pub temperature: f64,
    pub humidity: f64,
    pub description: String,
}

/// Validates the city path parameter of a weather lookup. Apart from the
/// missing-city message it follows the subscription city rules.
pub fn parse_weather_city(city: Option<String>) -> Result<City, ValidationErrors> {
    let city = city.ok_or_else(|| ValidationErrors::from(CITY_PARAMETER_REQUIRED.to_string()))?;

    City::parse(city).map_err(|e| {
        if e == City::REQUIRED {
            ValidationErrors::from(CITY_PARAMETER_REQUIRED.to_string())
        } else {
            ValidationErrors::from(e)
        }
    })
}
