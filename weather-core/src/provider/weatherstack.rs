use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    ProviderError, WeatherData,
    model::{kph_to_mps, positive},
    provider::{get_json, http_client},
};

use super::WeatherProvider;

const NAME: &str = "weatherstack";
const BASE_URL: &str = "http://api.weatherstack.com";

/// Current conditions from weatherstack.com, metric units.
#[derive(Debug, Clone)]
pub struct WeatherStackProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherStackProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: http_client(NAME)?,
        })
    }
}

// weatherstack answers errors with 200 and `"success": false`.
#[derive(Debug, Deserialize)]
struct WsError {
    code: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

impl WsError {
    fn message(&self) -> String {
        let detail = self
            .info
            .as_deref()
            .or(self.kind.as_deref())
            .unwrap_or("unknown error");
        match self.code {
            Some(code) => format!("error {code}: {detail}"),
            None => detail.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WsLocation {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsAstro {
    sunrise: Option<String>,
    sunset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WsCurrent {
    temperature: f64,
    feelslike: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<f64>,
    wind_speed: Option<f64>,
    wind_degree: Option<u16>,
    wind_dir: Option<String>,
    cloudcover: Option<u8>,
    uv_index: Option<f64>,
    precip: Option<f64>,
    is_day: Option<String>,
    #[serde(default)]
    weather_descriptions: Vec<String>,
    astro: Option<WsAstro>,
}

#[derive(Debug, Deserialize)]
struct WsResponse {
    error: Option<WsError>,
    location: Option<WsLocation>,
    current: Option<WsCurrent>,
}

impl WsResponse {
    fn into_weather(self, requested_city: &str) -> Result<WeatherData, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::Api { provider: NAME, message: error.message() });
        }

        let current = self.current.ok_or_else(|| ProviderError::Api {
            provider: NAME,
            message: "response contained no current conditions".to_string(),
        })?;

        let city = self
            .location
            .and_then(|l| l.name)
            .unwrap_or_else(|| requested_city.to_string());
        let description = current.weather_descriptions.into_iter().next().unwrap_or_default();
        let (sunrise, sunset) = match current.astro {
            Some(astro) => (astro.sunrise, astro.sunset),
            None => (None, None),
        };

        Ok(WeatherData {
            feels_like: current.feelslike,
            humidity: current.humidity,
            pressure: current.pressure,
            wind_speed: current.wind_speed.map(kph_to_mps),
            wind_degree: current.wind_degree,
            wind_dir: current.wind_dir,
            cloud: current.cloudcover,
            uv_index: current.uv_index,
            precip_mm: current.precip,
            rain_mm: positive(current.precip),
            snow_cm: None,
            is_day: current.is_day.map(|d| d.eq_ignore_ascii_case("yes")),
            sunrise,
            sunset,
            ..WeatherData::new(city, current.temperature, description)
        })
    }
}

#[async_trait]
impl WeatherProvider for WeatherStackProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ProviderError> {
        let url = format!("{}/current", self.base_url);
        let parsed: WsResponse = get_json(
            &self.http,
            NAME,
            &url,
            &[("access_key", self.api_key.as_str()), ("query", city), ("units", "m")],
        )
        .await?;

        parsed.into_weather(city)
    }
}
