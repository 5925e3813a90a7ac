use async_trait::async_trait;

use crate::{ProviderError, WeatherData};

use super::WeatherProvider;

/// Static provider for demos and tests. Never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeWeatherProvider;

#[async_trait]
impl WeatherProvider for FakeWeatherProvider {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ProviderError> {
        Ok(WeatherData {
            feels_like: Some(20.0),
            humidity: Some(50),
            pressure: Some(1013.0),
            wind_speed: Some(5.0),
            wind_degree: Some(180),
            wind_dir: Some("S".to_string()),
            cloud: Some(20),
            uv_index: Some(3.5),
            precip_mm: Some(0.0),
            rain_mm: Some(0.0),
            snow_cm: Some(0.0),
            is_day: Some(true),
            sunrise: Some("06:30".to_string()),
            sunset: Some("19:45".to_string()),
            ..WeatherData::new(city, 20.5, "Ясно (fake)")
        })
    }
}
