//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A folder in the file hierarchy.
///
/// Folders form a tree via `parent_folder_id`; a null parent means the
/// folder sits at the organization root. Trashed folders stay in the table
/// with `deleted = true` until restored or purged.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// The organization owning this folder.
    pub organization_id: Uuid,
    /// Parent folder ID (null for organization-root folders).
    pub parent_folder_id: Option<Uuid>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
    /// Whether the folder is in the trash.
    pub deleted: bool,
    /// Purge eligibility time (trash time + retention), set when trashed.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Folder {
    /// Check if this is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder_id.is_none()
    }

    /// Check if the folder is currently in the trash.
    pub fn is_trashed(&self) -> bool {
        self.deleted
    }

    /// Check if the folder is past its retention window and may be swept.
    pub fn is_purge_eligible(&self, now: DateTime<Utc>) -> bool {
        self.deleted && self.deleted_at.is_some_and(|at| at < now)
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Folder name.
    pub name: String,
    /// The owning organization.
    pub organization_id: Uuid,
    /// Parent folder (None for organization root).
    pub parent_folder_id: Option<Uuid>,
}
