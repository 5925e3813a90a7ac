use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{
    CachedWeatherRepository, Config, ProviderId, WeatherService,
    provider::default_provider_from_config,
};

use crate::console::{ConsoleUi, stdin_lines};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// Serve static demo data instead of calling a weather API.
    #[arg(long, global = true)]
    pub fake: bool,

    /// Provider to query, overriding config and PROVIDER_NAME.
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Cache time-to-live in seconds.
    #[arg(long, global = true)]
    pub ttl: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "weatherapi" or "weatherstack".
        provider: String,
    },

    /// Show weather for a city and exit.
    Show {
        /// City name.
        city: String,
    },

    /// Interactive loop reading city names from stdin (default).
    Console,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure { ref provider }) => configure(provider),
            Some(Command::Show { ref city }) => {
                let service = build_service(&self.config()?)?;
                let summary = service.get_weather_summary(city).await?;
                println!("{summary}");
                Ok(())
            }
            Some(Command::Console) | None => {
                let service = build_service(&self.config()?)?;
                let mut out = std::io::stdout();
                ConsoleUi::new(&service)
                    .run(stdin_lines(), &mut out, tokio::signal::ctrl_c())
                    .await
                    .context("Console I/O failed")
            }
        }
    }

    /// Effective config: file, then environment, then command-line flags.
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load()?;
        self.apply_flags(&mut config)?;
        Ok(config)
    }

    fn apply_flags(&self, config: &mut Config) -> anyhow::Result<()> {
        if self.fake {
            config.use_fake = true;
        }
        if let Some(name) = &self.provider {
            config.set_default_provider(ProviderId::try_from(name.as_str())?);
        }
        if let Some(ttl) = self.ttl {
            config.cache_ttl_secs = Some(ttl);
        }
        Ok(())
    }
}

/// Wire provider, cache and service together.
pub fn build_service(config: &Config) -> anyhow::Result<WeatherService<CachedWeatherRepository>> {
    let provider = default_provider_from_config(config)?;

    tracing::info!(
        provider = %config.default_provider_id()?,
        fake = config.use_fake,
        ttl = ?config.cache_ttl(),
        "weather service ready"
    );

    let repository = CachedWeatherRepository::new(provider, config.cache_ttl());
    Ok(WeatherService::new(repository))
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    // Only the file is persisted; environment overrides stay out of it.
    let mut config = Config::load_file()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());
    Ok(())
}
