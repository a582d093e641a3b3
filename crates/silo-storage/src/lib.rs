//! # silo-storage
//!
//! Blob store implementations for Silo. The [`BlobStore`] trait lives in
//! `silo-core`; this crate provides an S3-compatible provider (AWS S3,
//! DigitalOcean Spaces, MinIO) and an in-memory provider for tests and
//! local development.
//!
//! [`BlobStore`]: silo_core::traits::blob::BlobStore

pub mod providers;

pub use providers::memory::MemoryBlobStore;
pub use providers::s3::S3BlobStore;
