//! Folder CRUD operations.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use silo_core::error::AppError;
use silo_core::result::AppResult;
use silo_database::repositories::folder::FolderRepository;
use silo_entity::folder::{CreateFolder, Folder};

/// Manages folder CRUD operations over active rows.
///
/// Trash transitions are handled by [`TrashService`](crate::TrashService).
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder repository.
    folder_repo: Arc<FolderRepository>,
}

/// Request to create a new folder.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// The owning organization.
    pub organization_id: Uuid,
    /// Parent folder ID (None for organization root).
    pub parent_folder_id: Option<Uuid>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(folder_repo: Arc<FolderRepository>) -> Self {
        Self { folder_repo }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: Uuid) -> AppResult<Folder> {
        self.folder_repo
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))
    }

    /// Lists all active folders for an organization.
    pub async fn list_folders(&self, organization_id: Uuid) -> AppResult<Vec<Folder>> {
        self.folder_repo.find_active(organization_id).await
    }

    /// Lists active children of a folder, or root folders for `None`.
    pub async fn list_children(
        &self,
        organization_id: Uuid,
        parent_folder_id: Option<Uuid>,
    ) -> AppResult<Vec<Folder>> {
        match parent_folder_id {
            Some(parent) => {
                self.folder_repo
                    .find_active_children(organization_id, parent)
                    .await
            }
            None => self.folder_repo.find_active_roots(organization_id).await,
        }
    }

    /// Creates a new folder.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let folder = self
            .folder_repo
            .create(&CreateFolder {
                name: req.name,
                organization_id: req.organization_id,
                parent_folder_id: req.parent_folder_id,
            })
            .await?;

        info!(folder_id = %folder.id, "Created folder");
        Ok(folder)
    }

    /// Renames a folder.
    pub async fn rename_folder(&self, folder_id: Uuid, new_name: &str) -> AppResult<Folder> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        self.folder_repo.rename(folder_id, new_name).await
    }

    /// Moves a folder under a new parent (or to the organization root).
    pub async fn move_folder(
        &self,
        folder_id: Uuid,
        new_parent_id: Option<Uuid>,
    ) -> AppResult<Folder> {
        if new_parent_id == Some(folder_id) {
            return Err(AppError::validation("A folder cannot be its own parent"));
        }
        self.folder_repo.move_folder(folder_id, new_parent_id).await
    }
}
