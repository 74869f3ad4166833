use std::sync::Arc;

use anyhow::{Context, Result};
use domain::blob::{BlobStore, MemoryBlobStore};
use domain::store::{MemoryStore, Store};
use domain::SuggestionBox;
use suggestion_box_api::config::{Config, StorageBackend};
use suggestion_box_api::services::HttpBlobStore;
use suggestion_box_api::{app, middleware};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics().context("Failed to install metrics recorder")?;

    info!("Starting Suggestion Box API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn Store> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = persistence::db::create_pool(&config.database).await?;
            persistence::db::run_migrations(&pool).await?;
            Arc::new(persistence::PgStore::new(pool))
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; all data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let blobs: Arc<dyn BlobStore> = if config.object_store.enabled {
        Arc::new(HttpBlobStore::new(&config.object_store)?)
    } else {
        warn!("Object store disabled; images are kept in memory");
        Arc::new(MemoryBlobStore::new())
    };

    let engine = SuggestionBox::new(store, blobs);
    let app = app::create_app(config.clone(), engine)?;

    let addr = config.socket_addr()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
