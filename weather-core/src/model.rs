use serde::{Deserialize, Serialize};

/// A flat snapshot of current weather for one city.
///
/// Every optional field is `None` when the provider did not report it.
/// `None` means "unknown": a provider omitting rain is not the same thing
/// as a provider reporting `0.0` mm of rain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    pub city: String,
    /// Air temperature in °C.
    pub temperature: f64,
    pub description: String,

    pub feels_like: Option<f64>,
    /// Relative humidity, percent.
    pub humidity: Option<u8>,
    /// Pressure in millibars.
    pub pressure: Option<f64>,
    /// Wind speed in m/s.
    pub wind_speed: Option<f64>,
    pub wind_degree: Option<u16>,
    /// Compass abbreviation, e.g. "NNE".
    pub wind_dir: Option<String>,
    /// Cloud cover, percent.
    pub cloud: Option<u8>,
    pub uv_index: Option<f64>,

    pub precip_mm: Option<f64>,
    pub rain_mm: Option<f64>,
    pub snow_cm: Option<f64>,

    pub is_day: Option<bool>,
    /// Local time text exactly as the provider sent it.
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

impl WeatherData {
    /// Record with the required fields set and everything else unknown.
    pub fn new(city: impl Into<String>, temperature: f64, description: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            temperature,
            description: description.into(),
            feels_like: None,
            humidity: None,
            pressure: None,
            wind_speed: None,
            wind_degree: None,
            wind_dir: None,
            cloud: None,
            uv_index: None,
            precip_mm: None,
            rain_mm: None,
            snow_cm: None,
            is_day: None,
            sunrise: None,
            sunset: None,
        }
    }
}

/// Keep a precipitation reading only when it is strictly positive.
///
/// Providers report "no rain" as `0`; the rain/snow fields treat that as absent,
/// unlike temperature or humidity where zero is a real value.
pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// km/h to m/s.
pub(crate) fn kph_to_mps(kph: f64) -> f64 {
    kph / 3.6
}
