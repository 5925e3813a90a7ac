use async_trait::async_trait;
use parking_lot::Mutex;
use std::{collections::HashMap, time::Duration};
use tokio::time::Instant;

use crate::{ProviderError, WeatherData, WeatherProvider};

/// TTL used by the CLI unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Source of weather records for the service layer, possibly cached.
#[async_trait]
pub trait WeatherRepository: Send + Sync {
    async fn get_weather(&self, city: &str) -> Result<WeatherData, ProviderError>;
}

#[derive(Debug)]
struct CacheEntry {
    data: WeatherData,
    captured_at: Instant,
}

/// Memoizes provider results per city for a fixed time-to-live.
///
/// Keys are the lowercased city name. Entries are overwritten after expiry
/// but never evicted, so the map grows with the number of distinct cities
/// queried during the process lifetime. Errors are not cached.
#[derive(Debug)]
pub struct CachedWeatherRepository {
    provider: Box<dyn WeatherProvider>,
    ttl: Duration,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl CachedWeatherRepository {
    pub fn new(provider: Box<dyn WeatherProvider>, ttl: Duration) -> Self {
        Self { provider, ttl, cache: Mutex::new(HashMap::new()) }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of cities with a stored snapshot, fresh or stale.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    fn fresh(&self, key: &str) -> Option<WeatherData> {
        let cache = self.cache.lock();
        let entry = cache.get(key)?;
        (entry.captured_at.elapsed() < self.ttl).then(|| entry.data.clone())
    }
}

#[async_trait]
impl WeatherRepository for CachedWeatherRepository {
    async fn get_weather(&self, city: &str) -> Result<WeatherData, ProviderError> {
        let key = city.to_lowercase();

        if let Some(data) = self.fresh(&key) {
            tracing::debug!(city = %key, "using cached weather");
            return Ok(data);
        }

        tracing::debug!(city = %key, "cache miss, fetching weather");
        let data = self.provider.fetch_weather(city).await?;

        self.cache
            .lock()
            .insert(key, CacheEntry { data: data.clone(), captured_at: Instant::now() });

        Ok(data)
    }
}
