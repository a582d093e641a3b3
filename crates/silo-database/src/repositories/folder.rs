//! Folder repository implementation.
//!
//! CRUD plumbing over active (non-trashed) folder rows. Trash lifecycle
//! transitions live in the [`trash`](super::trash) module.

use sqlx::PgPool;
use uuid::Uuid;

use silo_core::error::{AppError, ErrorKind};
use silo_core::result::AppResult;
use silo_entity::folder::model::{CreateFolder, Folder};

use super::trash::SUBTREE_CTE;

/// Repository for folder CRUD and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID, trashed or not.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// List all active folders for an organization.
    pub async fn find_active(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE organization_id = $1 AND deleted = false ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    /// List active root folders for an organization.
    pub async fn find_active_roots(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE organization_id = $1 AND parent_folder_id IS NULL AND deleted = false \
             ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list root folders", e))
    }

    /// List active direct children of a folder.
    pub async fn find_active_children(
        &self,
        organization_id: Uuid,
        parent_folder_id: Uuid,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE organization_id = $1 AND parent_folder_id = $2 AND deleted = false \
             ORDER BY name ASC",
        )
        .bind(organization_id)
        .bind(parent_folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (id, name, organization_id, parent_folder_id, deleted) \
             VALUES ($1, $2, $3, $4, false) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.name)
        .bind(data.organization_id)
        .bind(data.parent_folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create folder", e))
    }

    /// Rename a folder. Only active folders can be renamed.
    pub async fn rename(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted = false RETURNING *",
        )
        .bind(folder_id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Move a folder under a new parent. Only active folders can be moved,
    /// and never into their own subtree: a reparent that would close a
    /// parent cycle is rejected before the update runs.
    pub async fn move_folder(
        &self,
        folder_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        if let Some(parent_id) = new_parent_id {
            let inside_own_subtree = sqlx::query_scalar::<_, bool>(&format!(
                "{SUBTREE_CTE} SELECT EXISTS (SELECT 1 FROM subtree WHERE id = $2)"
            ))
            .bind(folder_id)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check folder ancestry", e)
            })?;

            if inside_own_subtree {
                return Err(AppError::validation(
                    "Cannot move a folder into its own subtree",
                ));
            }
        }

        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_folder_id = $2, updated_at = NOW() \
             WHERE id = $1 AND deleted = false RETURNING *",
        )
        .bind(folder_id)
        .bind(new_parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }
}
