//! Account administration
//!
//! Admin-only management of the local `profiles` rows. Account creation goes
//! through the identity provider and is unavailable without one; removal only
//! deletes the profile row.

use std::sync::Arc;

use docvault_core::validation::require_non_empty;
use docvault_core::{Actor, AppError, Profile, ProfilePatch};
use docvault_db::ProfileStore;
use uuid::Uuid;

use crate::identity::{IdentityProvider, PendingConfirmation, ProvisionRequest};

pub struct AccountService {
    profiles: Arc<dyn ProfileStore>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl AccountService {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self {
            profiles,
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// All profiles, newest first.
    pub async fn list_profiles(&self, actor: &Actor) -> Result<Vec<Profile>, AppError> {
        actor.require_admin("list accounts")?;
        self.profiles.list().await
    }

    /// Create an account. Email, password and display name are all required.
    #[tracing::instrument(skip(self, request), fields(role = %request.role))]
    pub async fn provision(
        &self,
        actor: &Actor,
        request: ProvisionRequest,
    ) -> Result<PendingConfirmation, AppError> {
        actor.require_admin("create accounts")?;
        let identity = self.identity.as_ref().ok_or_else(|| {
            AppError::Config("No identity provider configured for account creation".to_string())
        })?;

        let email = require_non_empty("Email", &request.email)?;
        let display_name = require_non_empty("Display name", &request.display_name)?;
        if request.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        let request = ProvisionRequest {
            email,
            display_name,
            ..request
        };

        let pending = identity.provision_account(request).await?;
        tracing::info!(account_id = %pending.account_id, "Account provisioned, awaiting confirmation");
        Ok(pending)
    }

    /// Change a profile's display name and/or role.
    #[tracing::instrument(skip(self, patch), fields(profile_id = %id))]
    pub async fn update_profile(
        &self,
        actor: &Actor,
        id: Uuid,
        patch: ProfilePatch,
    ) -> Result<Profile, AppError> {
        actor.require_admin("edit accounts")?;

        let display_name = match patch.display_name {
            Some(name) => Some(require_non_empty("Display name", &name)?),
            None => None,
        };
        if display_name.is_none() && patch.role.is_none() {
            return Err(AppError::Validation(
                "Update must change at least one field".to_string(),
            ));
        }

        let patch = ProfilePatch {
            display_name,
            role: patch.role,
        };
        let profile = self.profiles.update(id, &patch).await?;
        tracing::info!(role = %profile.role, "Profile updated");
        Ok(profile)
    }

    /// Delete a profile row. Missing profiles are not an error.
    #[tracing::instrument(skip(self), fields(profile_id = %id))]
    pub async fn remove_profile(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.require_admin("remove accounts")?;

        if self.profiles.delete(id).await? {
            tracing::info!("Profile removed");
        } else {
            tracing::debug!("Profile already absent");
        }
        Ok(())
    }
}
