//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use docvault_core::AppError;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Signing failed: {0}")]
    SignFailed(String),

    #[error("Invalid storage path: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(path) => {
                AppError::Conflict(format!("Storage path already in use: {}", path))
            }
            StorageError::NotFound(path) => {
                AppError::NotFound(format!("Stored object not found: {}", path))
            }
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            StorageError::ConfigError(msg) => AppError::Config(msg),
            other => AppError::Transport(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Implemented by the S3 and local filesystem backends. Backends hold no state
/// beyond their connection settings.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write a new object at `storage_path`.
    ///
    /// Paths are write-once: if an object already exists there the call fails
    /// with `StorageError::Conflict` and the existing object is left untouched.
    async fn put(&self, storage_path: &str, data: Vec<u8>, content_type: &str)
        -> StorageResult<()>;

    /// Remove objects. Paths that do not exist are skipped, so removal is idempotent.
    async fn remove(&self, storage_paths: &[String]) -> StorageResult<()>;

    /// Generate a time-limited read URL for an existing object.
    ///
    /// Fails with `StorageError::NotFound` when there is no object at the path.
    /// Every call produces a new URL; callers must not cache them.
    async fn sign(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, storage_path: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
