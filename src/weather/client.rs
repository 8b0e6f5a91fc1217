// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! OpenWeatherMap forecast client.
//!
//! Fetches the 5 day / 3 hour forecast for a ZIP code and deserializes it
//! into typed records. Fields the API may omit are explicit options.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

/// 5 day / 3 hour forecast endpoint.
pub const FORECAST_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct Forecast {
    #[serde(default)]
    pub city: Option<City>,
    /// Forecast slots in 3 hour steps, nearest first.
    #[serde(default)]
    pub list: Vec<ForecastSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub name: Option<String>,
    pub country: Option<String>,
}

/// One 3 hour forecast slot.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSlot {
    /// Unix timestamp of the slot.
    pub dt: i64,
    /// Human readable slot time ("2026-08-25 12:00:00").
    pub dt_txt: Option<String>,
    pub main: SlotReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

/// Numeric readings of a slot. Units are metric.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotReadings {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub main: Option<String>,
    pub description: Option<String>,
}

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// The nearest slot's temperature as a display string, e.g. "21.5°C".
pub fn first_temperature(forecast: &Forecast) -> Option<String> {
    let temp = forecast.list.first()?.main.temp?;
    Some(format!("{}°C", temp))
}

/// Forecast API client.
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
    country: String,
}

impl WeatherClient {
    /// Create a client for the given API key and country code.
    pub fn new(api_key: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            country: country.into(),
        }
    }

    /// Fetch the forecast for a ZIP code.
    pub async fn forecast_by_zip(&self, zip: &str) -> Result<Forecast> {
        if self.api_key.is_empty() {
            bail!("No OpenWeatherMap API key configured; set [weather] api_key in config.toml");
        }

        let place = format!("{},{}", zip, self.country);
        debug!("Fetching forecast for {}", place);

        let response = self
            .http
            .get(FORECAST_ENDPOINT)
            .query(&[
                ("zip", place.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Forecast request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| "no detail".to_string());
            bail!("Forecast lookup failed ({}): {}", status, detail);
        }

        let forecast = response
            .json::<Forecast>()
            .await
            .context("Failed to parse forecast response")?;
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cod": "200",
        "city": {"id": 5128581, "name": "New York", "country": "US"},
        "list": [
            {
                "dt": 1756117200,
                "dt_txt": "2026-08-25 12:00:00",
                "main": {"temp": 21.5, "feels_like": 21.1, "humidity": 64},
                "weather": [{"id": 802, "main": "Clouds", "description": "scattered clouds"}]
            },
            {
                "dt": 1756128000,
                "main": {"temp": 24}
            }
        ]
    }"#;

    #[test]
    fn test_forecast_deserializes_with_optional_fields_absent() {
        let forecast: Forecast = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(forecast.city.as_ref().unwrap().name.as_deref(), Some("New York"));
        assert_eq!(forecast.list.len(), 2);
        assert_eq!(forecast.list[0].main.temp, Some(21.5));
        assert_eq!(forecast.list[0].main.humidity, Some(64));
        assert_eq!(
            forecast.list[0].weather[0].description.as_deref(),
            Some("scattered clouds")
        );

        // Second slot omits most fields
        assert_eq!(forecast.list[1].dt_txt, None);
        assert_eq!(forecast.list[1].main.feels_like, None);
        assert!(forecast.list[1].weather.is_empty());
    }

    #[test]
    fn test_first_temperature_formats_display_string() {
        let forecast: Forecast = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(first_temperature(&forecast).as_deref(), Some("21.5°C"));
    }

    #[test]
    fn test_first_temperature_drops_fraction_for_whole_degrees() {
        let forecast: Forecast =
            serde_json::from_str(r#"{"list": [{"dt": 0, "main": {"temp": 24.0}}]}"#).unwrap();
        assert_eq!(first_temperature(&forecast).as_deref(), Some("24°C"));
    }

    #[test]
    fn test_first_temperature_none_without_slots() {
        let forecast: Forecast = serde_json::from_str(r#"{"list": []}"#).unwrap();
        assert_eq!(first_temperature(&forecast), None);
    }

    #[test]
    fn test_error_body_parses() {
        let err: ApiError = serde_json::from_str(r#"{"cod": "404", "message": "city not found"}"#)
            .unwrap();
        assert_eq!(err.message.as_deref(), Some("city not found"));
    }
}
