use crate::{ProviderError, WeatherData, WeatherRepository};

/// Turns repository records into human-readable summaries.
#[derive(Debug)]
pub struct WeatherService<R> {
    repository: R,
}

impl<R: WeatherRepository> WeatherService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn get_weather_summary(&self, city: &str) -> Result<String, ProviderError> {
        let weather = self.repository.get_weather(city).await?;
        Ok(format_summary(&weather))
    }
}

/// Render a record as one line per known attribute.
///
/// The headline is always present. Optional attributes follow in a fixed
/// order and are skipped when unknown; nothing is printed as zero unless
/// the provider reported zero.
pub fn format_summary(w: &WeatherData) -> String {
    let wind_dir = non_empty(&w.wind_dir);

    let mut lines = vec![format!(
        "🌆 Weather in {}: {:.1}°C, {}",
        w.city, w.temperature, w.description
    )];

    let optional = [
        w.feels_like.map(|v| format!("🌡️ Feels like: {v:.1}°C")),
        w.humidity.map(|v| format!("💧 Humidity: {v}%")),
        w.pressure.map(|v| format!("📈 Pressure: {v:.0} mbar")),
        w.wind_speed.map(|v| match wind_dir {
            Some(dir) => format!("🌬️ Wind: {v:.1} m/s ({dir})"),
            None => format!("🌬️ Wind: {v:.1} m/s"),
        }),
        w.cloud.map(|v| format!("☁️ Cloudiness: {v}%")),
        w.uv_index.map(|v| format!("🌞 UV index: {v:.1}")),
        w.precip_mm.map(|v| format!("🌧️ Precipitation: {v:.1} mm")),
        w.rain_mm.map(|v| format!("🌧️ Rain: {v:.1} mm")),
        w.snow_cm.map(|v| format!("❄️ Snow: {v:.1} cm")),
    ];
    lines.extend(optional.into_iter().flatten());

    if let Some(is_day) = w.is_day {
        lines.push(if is_day { "🌞 Day" } else { "🌙 Night" }.to_string());
    }

    if let (Some(sunrise), Some(sunset)) = (non_empty(&w.sunrise), non_empty(&w.sunset)) {
        lines.push(format!("🌅 Sunrise: {sunrise}, 🌇 Sunset: {sunset}"));
    }

    lines.join("\n")
}

/// Providers sometimes send `""` for text they don't have.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
