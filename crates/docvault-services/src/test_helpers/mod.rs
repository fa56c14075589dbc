//! In-memory implementations of the adapter traits and the identity provider,
//! with fault injection for exercising partial failures.

pub mod fixtures;
pub mod mock_identity;
pub mod mock_repositories;
pub mod mock_storage;

pub use mock_identity::MockIdentity;
pub use mock_repositories::{MockFileStore, MockProfileStore};
pub use mock_storage::MockStorage;
