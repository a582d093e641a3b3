//! Scheduled maintenance tasks for Silo.
//!
//! Provides a cron scheduler running the daily expired-trash sweep.

pub mod scheduler;

pub use scheduler::CronScheduler;
