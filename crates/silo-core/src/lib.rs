//! # silo-core
//!
//! Core crate for Silo. Contains configuration schemas, the blob store
//! trait seam, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Silo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
