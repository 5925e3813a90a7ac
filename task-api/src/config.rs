use anyhow::Context;
use axum::http::HeaderValue;
use clap::Parser;
use std::{net::SocketAddr, path::PathBuf};

/// Command-line and environment settings for the server.
#[derive(Debug, Clone, Parser)]
#[command(name = "task-api", version, about = "Task list REST API")]
pub struct Settings {
    /// SQLite database file.
    #[arg(long, env = "TASK_API_DB", default_value = "tasks.db")]
    pub db: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "TASK_API_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Origins allowed by CORS, comma-separated.
    #[arg(
        long = "cors-origin",
        env = "TASK_API_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost"
    )]
    pub cors_origins: Vec<String>,
}

impl Settings {
    pub fn cors_header_values(&self) -> anyhow::Result<Vec<HeaderValue>> {
        self.cors_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin '{origin}'"))
            })
            .collect()
    }
}
