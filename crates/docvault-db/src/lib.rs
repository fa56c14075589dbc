//! Metadata store adapter for DocVault.
//!
//! The `files` and `profiles` tables are the source of truth for listings. The
//! traits in [`db::traits`] are what the services depend on; the Postgres
//! repositories implement them with `sqlx`.

pub mod db;
pub mod setup;

pub use db::{FileRepository, FileStore, ProfileRepository, ProfileStore};
pub use setup::setup_database;
