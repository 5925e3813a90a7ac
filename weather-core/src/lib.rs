//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers (two live HTTP sources plus a fake one)
//! - A per-city time-to-live cache in front of a provider
//! - Formatting of weather records into console summaries
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod repository;
pub mod service;

pub use config::{Config, ProviderConfig};
pub use error::ProviderError;
pub use model::WeatherData;
pub use provider::{ProviderId, WeatherProvider, fake::FakeWeatherProvider};
pub use repository::{CachedWeatherRepository, WeatherRepository};
pub use service::{WeatherService, format_summary};
