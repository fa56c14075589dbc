//! Database repositories for data access layer
//!
//! Each repository owns one table and exposes CRUD operations. No caching happens
//! here: every call is a round trip to Postgres and callers keep their own state.

pub mod files;
pub mod profiles;
pub mod traits;

pub use files::FileRepository;
pub use profiles::ProfileRepository;
pub use traits::{FileStore, ProfileStore};
