//! Folder request plumbing.

pub mod service;

pub use service::FolderService;
