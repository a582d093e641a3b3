//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use silo_core::config::worker::WorkerConfig;
use silo_core::error::AppError;
use silo_service::TrashService;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Trash lifecycle manager driving the sweep
    trash: Arc<TrashService>,
    /// Worker configuration
    config: WorkerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new(trash: Arc<TrashService>, config: WorkerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            trash,
            config,
        })
    }

    /// Register all default scheduled tasks
    pub async fn register_default_tasks(&self) -> Result<(), AppError> {
        self.register_trash_sweep().await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }

    /// Expired-trash sweep — daily by default.
    ///
    /// Fire-and-forget: the sweep logs its own outcome and never errors;
    /// rows that could not be purged still satisfy the expiry predicate
    /// and are retried on the next run.
    async fn register_trash_sweep(&self) -> Result<(), AppError> {
        let trash = Arc::clone(&self.trash);
        let schedule = self.config.sweep_schedule.clone();

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let trash = Arc::clone(&trash);
            Box::pin(async move {
                tracing::debug!("Running expired-trash sweep");
                let outcome = trash.purge_expired().await;
                tracing::info!(
                    files_purged = outcome.files_purged,
                    files_skipped = outcome.files_skipped,
                    folders_purged = outcome.folders_purged,
                    "Expired-trash sweep completed"
                );
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create trash_sweep schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add trash_sweep schedule: {}", e)))?;

        tracing::info!(schedule = %schedule, "Registered: trash_sweep");
        Ok(())
    }
}
