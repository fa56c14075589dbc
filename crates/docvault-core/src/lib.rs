//! DocVault Core Library
//!
//! This crate provides the domain models, error types, configuration and the pure
//! logic (category classification, browsing) shared by every DocVault component.

pub mod browse;
pub mod classify;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use browse::{view, BrowseQuery, CategoryFilter, SortDirection, SortField, SortSpec};
pub use classify::classify;
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{Actor, Category, FilePatch, FileRecord, NewFileRecord, Profile, ProfilePatch, Role};
pub use storage_types::StorageBackend;
