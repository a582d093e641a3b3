//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A file stored in Silo.
///
/// The row is the authoritative record of the file's lifecycle; the bytes
/// live in the blob store under the opaque `file_path` key and are removed
/// only when the row is finally purged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct File {
    /// Unique file identifier.
    pub id: Uuid,
    /// The file name (including extension).
    pub name: String,
    /// The folder containing this file (null means organization root).
    pub folder_id: Option<Uuid>,
    /// Opaque key into the blob store.
    pub file_path: String,
    /// File size in bytes.
    pub file_size: i64,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
    /// The organization owning this file.
    pub organization_id: Uuid,
    /// Whether the file is in the trash.
    pub deleted: bool,
    /// Purge eligibility time (trash time + retention), set when trashed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl File {
    /// Check if the file is currently in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted
    }

    /// Check if the file is past its retention window and may be swept.
    pub fn is_purge_eligible(&self, now: DateTime<Utc>) -> bool {
        self.deleted && self.deleted_at.is_some_and(|at| at < now)
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file name.
    pub name: String,
    /// The folder to place the file in (None for organization root).
    pub folder_id: Option<Uuid>,
    /// Blob store key where the bytes were uploaded.
    pub file_path: String,
    /// File size in bytes.
    pub file_size: i64,
    /// The owning organization.
    pub organization_id: Uuid,
}
