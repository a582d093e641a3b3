//! Trash sweep worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled trash sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduled sweep is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the expired-trash sweep (seconds granularity).
    #[serde(default = "default_sweep_schedule")]
    pub sweep_schedule: String,
    /// Days a trashed entity is retained before it becomes purge-eligible.
    #[serde(default = "default_retention_days")]
    pub trash_retention_days: i64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            sweep_schedule: default_sweep_schedule(),
            trash_retention_days: default_retention_days(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sweep_schedule() -> String {
    // Daily at 2 AM
    "0 0 2 * * *".to_string()
}

fn default_retention_days() -> i64 {
    30
}
