//! # silo-service
//!
//! Business logic services for Silo. [`TrashService`] owns the folder/file
//! trash lifecycle (trash, restore, purge, scheduled sweep); [`FolderService`]
//! and [`FileService`] are thin request plumbing over the repositories.
//!
//! [`TrashService`]: trash::TrashService
//! [`FolderService`]: folder::FolderService
//! [`FileService`]: file::FileService

pub mod file;
pub mod folder;
pub mod trash;

pub use file::FileService;
pub use folder::FolderService;
pub use trash::TrashService;
