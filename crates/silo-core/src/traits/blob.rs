//! Blob store trait for the object storage backend holding file bytes.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for the blob storage backend.
///
/// Blobs are addressed by the opaque `file_path` key recorded on each file
/// row. The blob store owns raw bytes only; its lifecycle is driven entirely
/// by the file row's transitions, and deletion happens exclusively at final
/// purge. The [`BlobStore`] trait is defined here in `silo-core` and
/// implemented in `silo-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "s3", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Delete the object stored under `key`.
    ///
    /// Delete-if-exists semantics: deleting a key that does not exist is
    /// not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
