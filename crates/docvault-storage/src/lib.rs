//! DocVault Storage Library
//!
//! Blob store adapter for the documents bucket: the `Storage` trait plus S3 and
//! local filesystem implementations.
//!
//! # Storage path format
//!
//! Paths are owner-scoped and write-once: `{owner_id}/{unix_millis}_{uuid}[.{ext}]`.
//! A path is generated fresh for every upload and never reused. Paths must not
//! contain `..` or a leading `/`. Path generation lives in the `keys` module so
//! every caller and backend agrees on the layout.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use docvault_core::StorageBackend;
pub use factory::create_storage;
pub use keys::generate_storage_path;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
