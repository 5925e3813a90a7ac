use crate::{
    Config, ProviderError, WeatherData,
    error::truncate_body,
    provider::{
        fake::FakeWeatherProvider, weatherapi::WeatherApiProvider,
        weatherstack::WeatherStackProvider,
    },
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug, time::Duration};

pub mod fake;
pub mod weatherapi;
pub mod weatherstack;

/// Deadline for a single outbound request to a weather source.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherApi,
    WeatherStack,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::WeatherStack => "weatherstack",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "WEATHERAPI_KEY",
            ProviderId::WeatherStack => "WEATHERSTACK_API_KEY",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::WeatherApi, ProviderId::WeatherStack]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "weatherstack" => Ok(ProviderId::WeatherStack),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherapi, weatherstack."
            )),
        }
    }
}

/// One external source of current weather.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, city: &str) -> Result<WeatherData, ProviderError>;
}

/// Construct a provider from config and explicit ProviderId.
///
/// With `use_fake` set no API key is needed and the fake provider is returned.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    if config.use_fake {
        return Ok(Box::new(FakeWeatherProvider));
    }

    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: set {} or run `weather configure {id}` and enter your API key.",
            id.env_key()
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::WeatherApi => {
            Box::new(WeatherApiProvider::new(api_key.to_owned())?.with_lang(config.lang()))
        }
        ProviderId::WeatherStack => Box::new(WeatherStackProvider::new(api_key.to_owned())?),
    };

    Ok(boxed)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

pub(crate) fn http_client(provider: &'static str) -> Result<Client, ProviderError> {
    http_client_with_timeout(provider, REQUEST_TIMEOUT)
}

fn http_client_with_timeout(
    provider: &'static str,
    timeout: Duration,
) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ProviderError::Network { provider, source })
}

/// GET `url` and parse the JSON body, mapping each failure onto [`ProviderError`].
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    http: &Client,
    provider: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, ProviderError> {
    tracing::debug!(provider, url, "requesting current weather");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| ProviderError::Network { provider, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| ProviderError::Network { provider, source })?;

    if !status.is_success() {
        return Err(ProviderError::Status { provider, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(|source| ProviderError::Parse { provider, source })
}
