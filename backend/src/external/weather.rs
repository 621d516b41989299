//! Weather API client for fetching current conditions
//!
//! Integrates with OpenWeatherMap API; observations become model features

use reqwest::Client;
use serde::Deserialize;
use shared::{CurrentConditions, GeoPoint};

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// Source of current conditions at a coordinate
#[axum::async_trait]
pub trait ConditionsProvider: Send + Sync {
    async fn current_conditions(&self, location: GeoPoint) -> AppResult<CurrentConditions>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    main: OWMMain,
    wind: OWMWind,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OWMWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

impl WeatherClient {
    /// Build a client from configuration, applying the request timeout
    pub fn from_config(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Convert OpenWeatherMap current response to model conditions
    fn convert_current_response(data: OWMCurrentResponse) -> CurrentConditions {
        CurrentConditions {
            temperature_celsius: data.main.temp,
            precipitation_mm: data.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            humidity_percent: data.main.humidity,
            wind_speed_mps: data.wind.speed,
        }
    }
}

#[axum::async_trait]
impl ConditionsProvider for WeatherClient {
    /// Fetch current weather conditions by GPS coordinates
    async fn current_conditions(&self, location: GeoPoint) -> AppResult<CurrentConditions> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url, location.latitude, location.longitude, self.api_key
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ConditionsUnavailable(format!("Weather API request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ConditionsUnavailable(format!(
                "Weather API error: {} - {}",
                status, body
            )));
        }

        let data: OWMCurrentResponse = response.json().await.map_err(|e| {
            AppError::ConditionsUnavailable(format!("Failed to parse weather response: {}", e))
        })?;

        Ok(Self::convert_current_response(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "coord": {"lon": -71.9675, "lat": -13.5313},
        "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
        "main": {"temp": 14.2, "feels_like": 13.1, "pressure": 1021, "humidity": 72},
        "wind": {"speed": 3.6, "deg": 40},
        "rain": {"1h": 0.8},
        "name": "Cusco"
    }"#;

    #[test]
    fn test_convert_current_response() {
        let data: OWMCurrentResponse = serde_json::from_str(SAMPLE).unwrap();
        let conditions = WeatherClient::convert_current_response(data);

        assert_eq!(conditions.temperature_celsius, 14.2);
        assert_eq!(conditions.precipitation_mm, 0.8);
        assert_eq!(conditions.humidity_percent, 72.0);
        assert_eq!(conditions.wind_speed_mps, 3.6);
    }

    #[test]
    fn test_missing_rain_defaults_to_zero() {
        let json = r#"{"main": {"temp": 22.0, "humidity": 55}, "wind": {"speed": 1.2}}"#;
        let data: OWMCurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(WeatherClient::convert_current_response(data).precipitation_mm, 0.0);
    }

    #[test]
    fn test_from_config_trims_trailing_slash() {
        let config = WeatherConfig {
            api_endpoint: "http://localhost:9000/".to_string(),
            api_key: "key".to_string(),
            timeout_secs: 2,
        };
        let client = WeatherClient::from_config(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
