use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    ProviderError, WeatherData,
    model::{kph_to_mps, positive},
    provider::{get_json, http_client},
};

use super::WeatherProvider;

const NAME: &str = "weatherapi";
const BASE_URL: &str = "http://api.weatherapi.com";

/// Current conditions from WeatherAPI.com.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    lang: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Result<Self, ProviderError> {
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            lang: "ru".to_string(),
            http: http_client(NAME)?,
        })
    }

    /// Language of the condition text.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCondition {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: Option<f64>,
    humidity: Option<u8>,
    pressure_mb: Option<f64>,
    wind_kph: Option<f64>,
    wind_degree: Option<u16>,
    wind_dir: Option<String>,
    cloud: Option<u8>,
    uv: Option<f64>,
    precip_mm: Option<f64>,
    snow_cm: Option<f64>,
    is_day: Option<u8>,
    #[serde(default)]
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: Option<WaLocation>,
    current: WaCurrent,
}

impl WaResponse {
    fn into_weather(self, requested_city: &str) -> WeatherData {
        let current = self.current;
        let city = self
            .location
            .and_then(|l| l.name)
            .unwrap_or_else(|| requested_city.to_string());

        WeatherData {
            feels_like: current.feelslike_c,
            humidity: current.humidity,
            pressure: current.pressure_mb,
            wind_speed: current.wind_kph.map(kph_to_mps),
            wind_degree: current.wind_degree,
            wind_dir: current.wind_dir,
            cloud: current.cloud,
            uv_index: current.uv,
            precip_mm: current.precip_mm,
            rain_mm: positive(current.precip_mm),
            snow_cm: positive(current.snow_cm),
            is_day: current.is_day.map(|d| d != 0),
            ..WeatherData::new(city, current.temp_c, current.condition.text)
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ProviderError> {
        let url = format!("{}/v1/current.json", self.base_url);
        let parsed: WaResponse = get_json(
            &self.http,
            NAME,
            &url,
            &[("key", self.api_key.as_str()), ("q", city), ("lang", self.lang.as_str())],
        )
        .await?;

        Ok(parsed.into_weather(city))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn maps_current_conditions() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .and(query_param("key", "KEY"))
            .and(query_param("q", "paris"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "location": {"name": "Paris", "country": "France"},
                "current": {
                    "temp_c": 12.0,
                    "feelslike_c": 10.5,
                    "humidity": 81,
                    "pressure_mb": 1009.0,
                    "wind_kph": 18.0,
                    "wind_degree": 250,
                    "wind_dir": "WSW",
                    "cloud": 75,
                    "uv": 1.0,
                    "precip_mm": 0.3,
                    "snow_cm": 0.0,
                    "is_day": 0,
                    "condition": {"text": "Light rain"}
                }
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &server.uri())
            .unwrap()
            .with_lang("en");
        let w = provider.fetch_weather("paris").await.unwrap();

        assert_eq!(w.city, "Paris");
        assert_eq!(w.temperature, 12.0);
        assert_eq!(w.description, "Light rain");
        assert_eq!(w.humidity, Some(81));
        assert_eq!(w.wind_dir.as_deref(), Some("WSW"));
        assert!((w.wind_speed.unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(w.precip_mm, Some(0.3));
        assert_eq!(w.rain_mm, Some(0.3));
        assert_eq!(w.snow_cm, None);
        assert_eq!(w.is_day, Some(false));
        assert!(w.sunrise.is_none());
    }

    #[tokio::test]
    async fn missing_fields_stay_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/current.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {"temp_c": 0.0, "humidity": 0, "precip_mm": 0.0}
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let w = provider.fetch_weather("Reykjavik").await.unwrap();

        assert_eq!(w.city, "Reykjavik");
        assert_eq!(w.description, "");
        assert_eq!(w.humidity, Some(0));
        assert_eq!(w.precip_mm, Some(0.0));
        assert_eq!(w.rain_mm, None);
        assert_eq!(w.feels_like, None);
        assert_eq!(w.wind_speed, None);
        assert_eq!(w.is_day, None);
    }

    #[tokio::test]
    async fn missing_temperature_is_a_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "current": {"humidity": 40}
            })))
            .mount(&server)
            .await;

        let provider = WeatherApiProvider::with_base_url("KEY".into(), &server.uri()).unwrap();
        let err = provider.fetch_weather("Paris").await.unwrap_err();

        assert!(matches!(err, ProviderError::Parse { provider: "weatherapi", .. }));
    }
}
