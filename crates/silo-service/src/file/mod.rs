//! File request plumbing.

pub mod service;

pub use service::FileService;
