use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{provider::ProviderId, repository::DEFAULT_TTL};

const DEFAULT_LANG: &str = "ru";

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration, stored on disk and overridable from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Provider id, e.g. "weatherapi" or "weatherstack". Falls back to weatherapi.
    pub default_provider: Option<String>,

    /// Serve static data instead of calling out.
    #[serde(default)]
    pub use_fake: bool,

    pub cache_ttl_secs: Option<u64>,

    /// Language for condition text, where the provider supports it.
    pub lang: Option<String>,

    /// Example TOML:
    /// [providers.weatherapi]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        match self.default_provider.as_deref() {
            Some(s) => ProviderId::try_from(s),
            None => Ok(ProviderId::WeatherApi),
        }
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs.map(Duration::from_secs).unwrap_or(DEFAULT_TTL)
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    /// Load config from disk (empty default if absent), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        cfg.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Load only the on-disk config, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Override fields from variables returned by `lookup`; empty values are ignored.
    ///
    /// Recognised: `PROVIDER_NAME`, `USE_FAKE`, `WEATHER_CACHE_TTL`, `WEATHER_LANG`
    /// and each provider's key variable (see [`ProviderId::env_key`]).
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(name) = get("PROVIDER_NAME") {
            let id = ProviderId::try_from(name.as_str()).context("Invalid PROVIDER_NAME")?;
            self.set_default_provider(id);
        }

        for id in ProviderId::all() {
            if let Some(key) = get(id.env_key()) {
                self.providers.insert(id.as_str().to_string(), ProviderConfig { api_key: key });
            }
        }

        if let Some(flag) = get("USE_FAKE") {
            self.use_fake = is_truthy(&flag);
        }

        if let Some(ttl) = get("WEATHER_CACHE_TTL") {
            let secs = ttl
                .parse::<u64>()
                .with_context(|| format!("Invalid WEATHER_CACHE_TTL '{ttl}', expected seconds"))?;
            self.cache_ttl_secs = Some(secs);
        }

        if let Some(lang) = get("WEATHER_LANG") {
            self.lang = Some(lang);
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set/replace a provider API key; the first configured provider becomes the default.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.providers.get(provider_id.as_str()).map(|cfg| cfg.api_key.as_str())
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_provider_falls_back_to_weatherapi() {
        let cfg = Config::default();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::WeatherApi);
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(120));
        assert_eq!(cfg.lang(), "ru");
        assert!(!cfg.use_fake);
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::WeatherStack, "STACK_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::WeatherStack);

        let key = cfg.provider_api_key(ProviderId::WeatherStack);
        assert_eq!(key, Some("STACK_KEY"));
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), None);
    }

    #[test]
    fn upsert_does_not_override_existing_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "API_KEY".into());
        cfg.upsert_provider_api_key(ProviderId::WeatherStack, "STACK_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");

        assert_eq!(default, ProviderId::WeatherApi);
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), Some("API_KEY"));
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherStack), Some("STACK_KEY"));
    }

    #[test]
    fn set_default_provider_overrides_default() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "API_KEY".into());
        cfg.set_default_provider(ProviderId::WeatherStack);

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::WeatherStack);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "FROM_FILE".into());

        cfg.apply_env_with(env(&[
            ("PROVIDER_NAME", "WeatherStack"),
            ("WEATHERAPI_KEY", "FROM_ENV"),
            ("WEATHERSTACK_API_KEY", "STACK"),
            ("WEATHER_CACHE_TTL", "30"),
            ("WEATHER_LANG", "en"),
            ("USE_FAKE", "Yes"),
        ]))
        .unwrap();

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::WeatherStack);
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), Some("FROM_ENV"));
        assert_eq!(cfg.provider_api_key(ProviderId::WeatherStack), Some("STACK"));
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(30));
        assert_eq!(cfg.lang(), "en");
        assert!(cfg.use_fake);
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();

        cfg.apply_env_with(env(&[("WEATHERAPI_KEY", "  "), ("USE_FAKE", "")])).unwrap();

        assert_eq!(cfg.provider_api_key(ProviderId::WeatherApi), None);
        assert!(!cfg.use_fake);
    }

    #[test]
    fn use_fake_accepts_only_truthy_words() {
        let cases = [("1", true), ("on", true), ("TRUE", true), ("0", false), ("nope", false)];
        for (value, expected) in cases {
            let mut cfg = Config::default();
            cfg.apply_env_with(env(&[("USE_FAKE", value)])).unwrap();
            assert_eq!(cfg.use_fake, expected, "USE_FAKE={value}");
        }
    }

    #[test]
    fn unknown_provider_name_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_env_with(env(&[("PROVIDER_NAME", "accuweather")])).unwrap_err();

        assert!(err.to_string().contains("Invalid PROVIDER_NAME"));
    }

    #[test]
    fn bad_ttl_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply_env_with(env(&[("WEATHER_CACHE_TTL", "soon")])).unwrap_err();

        assert!(err.to_string().contains("WEATHER_CACHE_TTL"));
    }

    #[test]
    fn toml_roundtrip_keeps_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "KEY".into());
        cfg.cache_ttl_secs = Some(60);

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.provider_api_key(ProviderId::WeatherApi), Some("KEY"));
        assert_eq!(parsed.cache_ttl(), Duration::from_secs(60));
    }
}
