//! Silo Server — multi-tenant file storage backend
//!
//! Main entry point that wires all crates together: configuration,
//! logging, the database pool, the blob store, the lifecycle services,
//! and the scheduled trash sweep.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{fmt, EnvFilter};

use silo_core::config::AppConfig;
use silo_core::error::AppError;
use silo_core::traits::blob::BlobStore;
use silo_database::repositories::PgTrashStore;
use silo_database::DatabasePool;
use silo_service::TrashService;
use silo_storage::{MemoryBlobStore, S3BlobStore};
use silo_worker::CronScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("SILO_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).init();
        }
        _ => {
            fmt().with_env_filter(filter).init();
        }
    }
}

/// Build the configured blob store provider.
async fn build_blob_store(config: &AppConfig) -> Result<Arc<dyn BlobStore>, AppError> {
    match config.storage.provider.as_str() {
        "s3" => Ok(Arc::new(S3BlobStore::new(&config.storage.s3).await?)),
        "memory" => Ok(Arc::new(MemoryBlobStore::new())),
        other => Err(AppError::configuration(format!(
            "Unknown blob store provider '{other}'"
        ))),
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db = DatabasePool::connect(&config.database).await?;
    if !db.health_check().await? {
        return Err(AppError::database("Database ping failed"));
    }
    let pool = db.pool().clone();

    let blobs = build_blob_store(&config).await?;
    tracing::info!(provider = blobs.provider_type(), "Blob store ready");

    let trash_store = Arc::new(PgTrashStore::new(pool));
    let trash = Arc::new(TrashService::new(
        trash_store,
        blobs,
        config.worker.trash_retention_days,
    ));

    let mut scheduler = CronScheduler::new(Arc::clone(&trash), config.worker.clone()).await?;
    if config.worker.enabled {
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;
    } else {
        tracing::warn!("Scheduled trash sweep disabled by configuration");
    }

    tracing::info!("Silo server running; press Ctrl-C to stop");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for shutdown signal: {e}")))?;

    tracing::info!("Shutting down");
    scheduler.shutdown().await?;
    db.close().await;
    Ok(())
}
