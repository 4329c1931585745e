use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pinhole_core::{Repository, Shortener};
use pinhole_gateway::cli::{Cli, StorageBackendArg};
use pinhole_gateway::telemetry::init_tracing;
use pinhole_gateway::{App, AppState};
use pinhole_generator::CounterGenerator;
use pinhole_shortener::ShortenerService;
use pinhole_storage::{InMemoryRepository, MySqlRepository, TieredRepository};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    init_tracing(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting pinhole"
    );

    let shortener = build_shortener(&config).await?;
    let state = AppState::new(shortener, config.public_base_url);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    info!(listen_addr = %listener.local_addr()?, "server listening");

    axum::serve(listener, App::router(state)).await?;

    Ok(())
}

async fn build_shortener(config: &Cli) -> anyhow::Result<Arc<dyn Shortener>> {
    match config.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(ShortenerService::new(
            InMemoryRepository::new(),
            CounterGenerator::new(),
        ))),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(mysql_dsn)
                .await
                .context("failed to connect to mysql")?;
            repository
                .ensure_schema()
                .await
                .context("failed to prepare short_urls table")?;

            // Failed writes leave gaps, so the count can trail the last code
            // handed out. The service skips codes that are already taken.
            let stored = repository
                .count()
                .await
                .context("failed to count stored mappings")?;
            info!(stored, "resuming code counter");

            Ok(Arc::new(ShortenerService::new(
                TieredRepository::new(repository),
                CounterGenerator::with_offset(stored),
            )))
        }
    }
}
