//! Mock identity provider for testing

use async_trait::async_trait;
use chrono::Utc;
use docvault_core::{AppError, Profile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

use super::mock_repositories::MockProfileStore;
use crate::identity::{IdentityProvider, PendingConfirmation, ProvisionRequest, Session};

#[derive(Clone)]
struct Account {
    id: Uuid,
    password: String,
}

/// Identity provider backed by an in-memory account table.
///
/// When built with [`MockIdentity::with_profiles`], provisioning also creates the
/// profile row, as the real provider's signup hook does.
#[derive(Clone)]
pub struct MockIdentity {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    sessions: Arc<watch::Sender<Option<Session>>>,
    profiles: Option<MockProfileStore>,
}

impl Default for MockIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentity {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            sessions: Arc::new(sender),
            profiles: None,
        }
    }

    pub fn with_profiles(profiles: MockProfileStore) -> Self {
        Self {
            profiles: Some(profiles),
            ..Self::new()
        }
    }

    /// Register a confirmed account and return its id.
    pub fn add_account(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                id,
                password: password.to_string(),
            },
        );
        id
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.lock().unwrap().contains_key(email)
    }

    pub fn current_session(&self) -> Option<Session> {
        self.sessions.borrow().clone()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let account = self.accounts.lock().unwrap().get(email).cloned();
        match account {
            Some(account) if account.password == password => {
                let session = Session {
                    account_id: account.id,
                    email: email.to_string(),
                };
                self.sessions.send_replace(Some(session.clone()));
                Ok(session)
            }
            _ => Err(AppError::Auth("Invalid login credentials".to_string())),
        }
    }

    async fn sign_out(&self) -> Result<(), AppError> {
        self.sessions.send_replace(None);
        Ok(())
    }

    fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }

    async fn provision_account(
        &self,
        request: ProvisionRequest,
    ) -> Result<PendingConfirmation, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&request.email) {
            return Err(AppError::Conflict(format!(
                "User already registered: {}",
                request.email
            )));
        }
        let id = Uuid::new_v4();
        accounts.insert(
            request.email.clone(),
            Account {
                id,
                password: request.password,
            },
        );

        if let Some(profiles) = &self.profiles {
            profiles.seed(Profile {
                id,
                email: request.email.clone(),
                display_name: request.display_name,
                role: request.role,
                created_at: Utc::now(),
            });
        }

        Ok(PendingConfirmation {
            account_id: id,
            email: request.email,
        })
    }
}
