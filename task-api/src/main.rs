use clap::Parser;
use task_api::{Settings, TaskStore, create_router};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = Settings::parse();
    let origins = settings.cors_header_values()?;

    let store = TaskStore::open(&settings.db)?;
    tracing::info!(db = %settings.db.display(), "database ready");

    let router = create_router(store.into_shared(), origins);
    let listener = tokio::net::TcpListener::bind(settings.addr).await?;

    task_api::serve(listener, router, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
        }
    })
    .await
}
