//! Session service
//!
//! Resolves an identity-provider session into an [`Actor`] by loading the
//! account's profile. An account without a profile gets the read-only role.

use std::sync::Arc;

use docvault_core::validation::require_non_empty;
use docvault_core::{Actor, AppError, Profile, Role};
use docvault_db::ProfileStore;
use tokio::sync::watch;

use crate::identity::{IdentityProvider, Session};

/// A successful sign-in.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: Session,
    pub profile: Option<Profile>,
    pub actor: Actor,
}

pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl SessionService {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignedIn, AppError> {
        let email = require_non_empty("Email", email)?;
        if password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }

        let session = self.identity.sign_in(&email, password).await?;
        let (profile, actor) = self.resolve(&session).await?;
        tracing::info!(account_id = %session.account_id, role = %actor.role, "Signed in");

        Ok(SignedIn {
            session,
            profile,
            actor,
        })
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        self.identity.sign_out().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Session-change notifications from the identity provider.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.identity.session_changes()
    }

    /// Actor for an existing session, e.g. after a session-change notification.
    pub async fn actor_for(&self, session: &Session) -> Result<Actor, AppError> {
        let (_, actor) = self.resolve(session).await?;
        Ok(actor)
    }

    async fn resolve(&self, session: &Session) -> Result<(Option<Profile>, Actor), AppError> {
        let profile = self.profiles.get(session.account_id).await?;
        let actor = match &profile {
            Some(profile) => Actor::from(profile),
            None => {
                tracing::warn!(
                    account_id = %session.account_id,
                    "No profile for authenticated account, treating as read-only user"
                );
                Actor::new(session.account_id, Role::User)
            }
        };
        Ok((profile, actor))
    }
}
