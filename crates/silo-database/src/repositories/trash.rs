//! Trash lifecycle persistence: cascading soft-delete, restore, and purge.
//!
//! Folder cascades cover the full subtree (recursive CTE over
//! `parent_folder_id`) plus every file contained in it, and run inside a
//! single transaction so the cascade either fully applies or not at all.
//! Updates are constrained to the rows currently in the opposite state,
//! which makes every transition idempotent: a statement matching zero rows
//! is success, not an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use silo_core::error::{AppError, ErrorKind};
use silo_core::result::AppResult;
use silo_entity::file::model::File;
use silo_entity::folder::model::Folder;

/// Subtree CTE shared by every folder cascade statement.
///
/// Enumerates the target folder and all its descendants regardless of their
/// `deleted` flag; the outer statement applies the state constraint.
/// `UNION` (not `UNION ALL`) deduplicates, so the traversal reaches a
/// fixpoint even if a parent cycle ever makes it into the table.
pub(crate) const SUBTREE_CTE: &str = "WITH RECURSIVE subtree AS ( \
        SELECT id FROM folders WHERE id = $1 \
        UNION \
        SELECT f.id FROM folders f INNER JOIN subtree s ON f.parent_folder_id = s.id \
     )";

/// Persistence seam for the trash lifecycle manager.
///
/// Implemented by [`PgTrashStore`] for PostgreSQL; the service tests use an
/// in-memory double with the same semantics.
#[async_trait]
pub trait TrashStore: Send + Sync + std::fmt::Debug + 'static {
    /// Move an active file to the trash. Returns the number of rows moved
    /// (0 when the file is absent or already trashed).
    async fn trash_file(&self, file_id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<u64>;

    /// Restore a trashed file. Returns the number of rows restored.
    /// `deleted_at` is left as-is; a restored row ignores it.
    async fn restore_file(&self, file_id: Uuid) -> AppResult<u64>;

    /// Look up the blob key of a file, trashed or not.
    async fn file_blob_key(&self, file_id: Uuid) -> AppResult<Option<String>>;

    /// Delete a file row, constrained to `deleted = true`. Returns the
    /// number of rows removed. Callers must have deleted the blob first.
    async fn purge_file_row(&self, file_id: Uuid) -> AppResult<u64>;

    /// Move a folder, its descendant folders, and all contained files to
    /// the trash with one shared `deleted_at`, in a single transaction.
    /// Returns the total number of rows moved.
    async fn trash_folder_cascade(
        &self,
        folder_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Restore a trashed folder cascade (same set as
    /// [`trash_folder_cascade`](TrashStore::trash_folder_cascade)), in a
    /// single transaction. Returns the total number of rows restored.
    async fn restore_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64>;

    /// Blob keys of all trashed files anywhere under a folder subtree.
    async fn trashed_blob_keys_under(&self, folder_id: Uuid) -> AppResult<Vec<String>>;

    /// Delete the trashed rows of a folder cascade (files first, then
    /// folders), in a single transaction. Returns the total number of rows
    /// removed. Callers must have deleted the blobs first.
    async fn purge_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64>;

    /// Top-level trashed folders (`parent_folder_id IS NULL`) for an
    /// organization.
    async fn trashed_root_folders(&self, organization_id: Uuid) -> AppResult<Vec<Folder>>;

    /// Top-level trashed files (`folder_id IS NULL`) for an organization.
    async fn trashed_root_files(&self, organization_id: Uuid) -> AppResult<Vec<File>>;

    /// All trashed files of an organization, at any depth.
    async fn trashed_files(&self, organization_id: Uuid) -> AppResult<Vec<File>>;

    /// Delete all trashed folder rows of an organization. Returns the
    /// number of rows removed.
    async fn purge_trashed_folders(&self, organization_id: Uuid) -> AppResult<u64>;

    /// Files past their retention window (`deleted AND deleted_at < now`),
    /// across all organizations.
    async fn expired_files(&self, now: DateTime<Utc>) -> AppResult<Vec<File>>;

    /// Delete all expired folder rows across all organizations. Returns
    /// the number of rows removed.
    async fn purge_expired_folders(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// PostgreSQL-backed trash store.
#[derive(Debug, Clone)]
pub struct PgTrashStore {
    pool: PgPool,
}

impl PgTrashStore {
    /// Create a new trash store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrashStore for PgTrashStore {
    async fn trash_file(&self, file_id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE files SET deleted = true, deleted_at = $2 \
             WHERE id = $1 AND deleted = false",
        )
        .bind(file_id)
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to trash file", e))?;
        Ok(result.rows_affected())
    }

    async fn restore_file(&self, file_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("UPDATE files SET deleted = false WHERE id = $1 AND deleted = true")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore file", e))?;
        Ok(result.rows_affected())
    }

    async fn file_blob_key(&self, file_id: Uuid) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT file_path FROM files WHERE id = $1")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read file blob key", e)
            })
    }

    async fn purge_file_row(&self, file_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND deleted = true")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge file row", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn trash_folder_cascade(
        &self,
        folder_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let folders = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             UPDATE folders SET deleted = true, deleted_at = $2 \
             WHERE id IN (SELECT id FROM subtree) AND deleted = false"
        ))
        .bind(folder_id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to trash folder subtree", e)
        })?;

        let files = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             UPDATE files SET deleted = true, deleted_at = $2 \
             WHERE folder_id IN (SELECT id FROM subtree) AND deleted = false"
        ))
        .bind(folder_id)
        .bind(deleted_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to trash contained files", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit trash cascade", e)
        })?;

        Ok(folders.rows_affected() + files.rows_affected())
    }

    async fn restore_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let folders = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             UPDATE folders SET deleted = false \
             WHERE id IN (SELECT id FROM subtree) AND deleted = true"
        ))
        .bind(folder_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restore folder subtree", e)
        })?;

        let files = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             UPDATE files SET deleted = false \
             WHERE folder_id IN (SELECT id FROM subtree) AND deleted = true"
        ))
        .bind(folder_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to restore contained files", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit restore cascade", e)
        })?;

        Ok(folders.rows_affected() + files.rows_affected())
    }

    async fn trashed_blob_keys_under(&self, folder_id: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(&format!(
            "{SUBTREE_CTE} \
             SELECT file_path FROM files \
             WHERE folder_id IN (SELECT id FROM subtree) AND deleted = true"
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list blob keys", e))
    }

    async fn purge_folder_cascade(&self, folder_id: Uuid) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // Files first so folder rows are still present for the CTE walk.
        let files = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             DELETE FROM files \
             WHERE folder_id IN (SELECT id FROM subtree) AND deleted = true"
        ))
        .bind(folder_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge contained files", e)
        })?;

        let folders = sqlx::query(&format!(
            "{SUBTREE_CTE} \
             DELETE FROM folders \
             WHERE id IN (SELECT id FROM subtree) AND deleted = true"
        ))
        .bind(folder_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to purge folder subtree", e)
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit purge cascade", e)
        })?;

        Ok(folders.rows_affected() + files.rows_affected())
    }

    async fn trashed_root_folders(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders \
             WHERE organization_id = $1 AND deleted = true AND parent_folder_id IS NULL \
             ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed folders", e)
        })
    }

    async fn trashed_root_files(&self, organization_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files \
             WHERE organization_id = $1 AND deleted = true AND folder_id IS NULL \
             ORDER BY name ASC",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed files", e)
        })
    }

    async fn trashed_files(&self, organization_id: Uuid) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE organization_id = $1 AND deleted = true",
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list trashed files", e)
        })
    }

    async fn purge_trashed_folders(&self, organization_id: Uuid) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM folders WHERE organization_id = $1 AND deleted = true")
                .bind(organization_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to purge trashed folders",
                        e,
                    )
                })?;
        Ok(result.rows_affected())
    }

    async fn expired_files(&self, now: DateTime<Utc>) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE deleted = true AND deleted_at < $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list expired files", e))
    }

    async fn purge_expired_folders(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM folders WHERE deleted = true AND deleted_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired folders", e)
            })?;
        Ok(result.rows_affected())
    }
}
