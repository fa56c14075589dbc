//! Storage path generation and validation.
//!
//! Path format: `{owner_id}/{unix_millis}_{uuid}[.{ext}]`. The owner prefix scopes
//! objects per account, the timestamp and random UUID make every path unique.

use chrono::Utc;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const MAX_EXTENSION_LEN: usize = 16;

/// Generate a fresh, never-reused storage path for a file uploaded by `owner_id`.
pub fn generate_storage_path(owner_id: Uuid, file_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4();
    match file_extension(file_name) {
        Some(ext) => format!("{}/{}_{}.{}", owner_id, millis, suffix, ext),
        None => format!("{}/{}_{}", owner_id, millis, suffix),
    }
}

/// Extension of the original filename, kept only when it is short and alphanumeric.
pub fn file_extension(file_name: &str) -> Option<&str> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty()
        || ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext)
}

/// Reject paths that could escape the bucket root.
pub fn validate_key(storage_path: &str) -> StorageResult<()> {
    if storage_path.is_empty() {
        return Err(StorageError::InvalidKey(
            "Storage path must not be empty".to_string(),
        ));
    }
    if storage_path.contains("..") || storage_path.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage path contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
