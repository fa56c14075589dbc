//! Repository trait abstractions
//!
//! These traits define the interface the services need from the metadata tables,
//! allowing for easy mocking and testing without database dependencies.

use async_trait::async_trait;
use docvault_core::{AppError, FilePatch, FileRecord, NewFileRecord, Profile, ProfilePatch};
use uuid::Uuid;

/// Row-level access to the `files` table.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a new record. A reused storage path fails with `Conflict`.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError>;

    /// All records, newest first.
    async fn list_all(&self) -> Result<Vec<FileRecord>, AppError>;

    /// Get a record by ID
    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError>;

    /// Apply a partial update and bump `updated_at`.
    ///
    /// Fails with `NotFound` when no record has this id and with `Validation`
    /// when the patch changes nothing.
    async fn update_fields(&self, id: Uuid, patch: &FilePatch) -> Result<FileRecord, AppError>;

    /// Delete a record. Returns whether a row was removed; a missing id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError>;
}

/// Row-level access to the `profiles` table.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError>;

    /// All profiles, newest first.
    async fn list(&self) -> Result<Vec<Profile>, AppError>;

    /// Fails with `NotFound` when no profile has this id.
    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> Result<Profile, AppError>;

    /// Delete a profile row. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}
