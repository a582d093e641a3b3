//! Repository implementations over the PostgreSQL pool.

pub mod file;
pub mod folder;
pub mod trash;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use trash::{PgTrashStore, TrashStore};
