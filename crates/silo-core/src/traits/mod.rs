//! Core traits defined in `silo-core` and implemented by other crates.

pub mod blob;

pub use blob::BlobStore;
