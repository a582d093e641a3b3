//! # silo-database
//!
//! PostgreSQL connection management and repository implementations for
//! Silo. The relational store owns the authoritative lifecycle flags for
//! folders and files; all cascade operations run inside transactions here.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
