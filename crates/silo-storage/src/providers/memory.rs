//! In-memory blob store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use silo_core::result::AppResult;
use silo_core::traits::blob::BlobStore;

/// In-process blob store keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// Create a new empty memory blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes under a key.
    pub async fn put(&self, key: &str, data: Vec<u8>) {
        let mut objects = self.objects.write().await;
        objects.insert(key.to_string(), data);
    }

    /// Check whether a key is present.
    pub async fn contains(&self, key: &str) -> bool {
        let objects = self.objects.read().await;
        objects.contains_key(key)
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        let objects = self.objects.read().await;
        objects.len()
    }

    /// Whether the store holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        // Delete-if-exists: removing an absent key is not an error.
        let mut objects = self.objects.write().await;
        objects.remove(key);
        Ok(())
    }
}
