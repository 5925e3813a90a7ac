//! Task list REST API.
//!
//! - `db`: SQLite-backed [`TaskStore`]
//! - `routes`: axum router exposing CRUD over `/tasks`
//! - `config`: command-line/environment [`Settings`]

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod routes;

pub use config::Settings;
pub use db::{SharedStore, TaskStore};
pub use error::ApiError;
pub use model::{Task, TaskIn};
pub use routes::create_router;

use std::future::Future;
use tokio::net::TcpListener;

/// Serve `router` on `listener` until `shutdown` resolves.
pub async fn serve<S>(
    listener: TcpListener,
    router: axum::Router,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    tracing::info!(addr = %listener.local_addr()?, "HTTP server listening");
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
    tracing::info!("HTTP server stopped");
    Ok(())
}
