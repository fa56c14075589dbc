use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

/// Authorization role. `Admin` manages files and accounts, `User` only reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parse a stored role; unknown values get the read-only role.
    pub fn from_stored(value: &str) -> Role {
        value.parse().unwrap_or(Role::User)
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Local profile row for an account of the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Admin edit of a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub role: Option<Role>,
}

/// The account on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Forbidden` unless this actor holds the admin role.
    pub fn require_admin(&self, action: &str) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Administrator role required to {}",
                action
            )))
        }
    }
}

impl From<&Profile> for Actor {
    fn from(profile: &Profile) -> Self {
        Actor::new(profile.id, profile.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        assert!(admin.require_admin("delete files").is_ok());

        let reader = Actor::new(Uuid::new_v4(), Role::User);
        let err = reader.require_admin("delete files").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref msg) if msg.contains("delete files")));
    }

    #[test]
    fn test_unknown_role_is_read_only() {
        assert_eq!(Role::from_stored("superuser"), Role::User);
        assert_eq!(Role::from_stored("ADMIN"), Role::Admin);
    }
}
