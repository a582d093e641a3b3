//! File CRUD operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use silo_core::error::AppError;
use silo_core::result::AppResult;
use silo_database::repositories::file::FileRepository;
use silo_entity::file::{CreateFile, File};

/// Manages file record CRUD over active rows.
///
/// File bytes are uploaded to the blob store by the API layer; this
/// service only records the resulting row. Trash transitions are handled
/// by [`TrashService`](crate::TrashService).
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
}

/// Request to register an uploaded file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateFileRequest {
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

impl FileService {
    /// Creates a new file service.
    pub fn new(file_repo: Arc<FileRepository>) -> Self {
        Self { file_repo }
    }

    /// Gets a file by ID.
    pub async fn get_file(&self, file_id: Uuid) -> AppResult<File> {
        self.file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }

    /// Lists active files in a folder, or at the organization root for `None`.
    pub async fn list_files(
        &self,
        organization_id: Uuid,
        folder_id: Option<Uuid>,
    ) -> AppResult<Vec<File>> {
        match folder_id {
            Some(folder) => self.file_repo.find_active_in_folder(folder).await,
            None => self.file_repo.find_active_roots(organization_id).await,
        }
    }

    /// Records a newly uploaded file.
    pub async fn create_file(&self, req: CreateFileRequest) -> AppResult<File> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if req.file_path.trim().is_empty() {
            return Err(AppError::validation("File path cannot be empty"));
        }

        let file = self
            .file_repo
            .create(&CreateFile {
                name: req.name,
                folder_id: req.folder_id,
                file_path: req.file_path,
                file_size: req.file_size,
                organization_id: req.organization_id,
            })
            .await?;

        info!(file_id = %file.id, "Created file record");
        Ok(file)
    }

    /// Renames a file.
    pub async fn rename_file(&self, file_id: Uuid, new_name: &str) -> AppResult<File> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        self.file_repo.rename(file_id, new_name).await
    }

    /// Moves a file into a folder (or to the organization root).
    pub async fn move_file(&self, file_id: Uuid, folder_id: Option<Uuid>) -> AppResult<File> {
        self.file_repo.move_file(file_id, folder_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use silo_core::error::ErrorKind;
    use sqlx::postgres::PgPool;

    // A lazy pool never connects, so the validation paths run without a
    // database server.
    fn service() -> FileService {
        let pool = PgPool::connect_lazy("postgres://localhost:5432/silo").unwrap();
        FileService::new(Arc::new(FileRepository::new(pool)))
    }

    fn request(name: &str, file_path: &str) -> CreateFileRequest {
        CreateFileRequest {
            name: name.to_string(),
            folder_id: None,
            file_path: file_path.to_string(),
            file_size: 1,
            organization_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_create_file_rejects_blank_name() {
        let err = service().create_file(request(" ", "org/key")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_create_file_rejects_blank_path() {
        let err = service().create_file(request("a.txt", "")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_rename_file_rejects_blank_name() {
        let err = service().rename_file(Uuid::new_v4(), "  ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
