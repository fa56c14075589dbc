//! Contract of the external identity service.
//!
//! DocVault does not authenticate anyone itself; it consumes an identity provider
//! and keys local profiles by the account id the provider returns.

use async_trait::async_trait;
use docvault_core::{AppError, Role};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

/// An authenticated account as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub account_id: Uuid,
    pub email: String,
}

/// Input for creating a new account.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Role,
}

/// Account created, waiting for the user to confirm their email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingConfirmation {
    pub account_id: Uuid,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `AppError::Auth` on bad credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError>;

    async fn sign_out(&self) -> Result<(), AppError>;

    /// Current session, updated on every sign-in and sign-out.
    fn session_changes(&self) -> watch::Receiver<Option<Session>>;

    /// Create an account. The provider is responsible for creating the matching
    /// profile row with the requested display name and role.
    async fn provision_account(
        &self,
        request: ProvisionRequest,
    ) -> Result<PendingConfirmation, AppError>;
}
