//! DocVault services
//!
//! Orchestration over the blob and metadata adapters: upload, delete, access
//! links, record mutation, account administration and sessions. Services hold
//! no record state of their own; callers own the list and refresh it.

pub mod access;
pub mod accounts;
pub mod delete;
pub mod identity;
pub mod mutation;
pub mod session;
pub mod upload;

// In-memory doubles for the adapters and the identity service
pub mod test_helpers;

pub use access::AccessLinkService;
pub use accounts::AccountService;
pub use delete::DeleteService;
pub use identity::{IdentityProvider, PendingConfirmation, ProvisionRequest, Session};
pub use mutation::{reconcile_removal, reconcile_update, MutationService};
pub use session::{SessionService, SignedIn};
pub use upload::{FileOutcome, UploadFile, UploadReport, UploadService};
