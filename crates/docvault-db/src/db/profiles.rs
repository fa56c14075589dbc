use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docvault_core::{AppError, Profile, ProfilePatch, Role};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::traits::ProfileStore;

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            email: row.email,
            display_name: row.full_name,
            role: Role::from_stored(&row.role),
            created_at: row.created_at,
        }
    }
}

/// Repository for the `profiles` table
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for ProfileRepository {
    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query_as::<Postgres, ProfileRow>(
            "SELECT id, email, full_name, role, created_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Profile::from))
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Profile>, AppError> {
        let rows = sqlx::query_as::<Postgres, ProfileRow>(
            "SELECT id, email, full_name, role, created_at FROM profiles ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Profile::from).collect())
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "profiles", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> Result<Profile, AppError> {
        let row = sqlx::query_as::<Postgres, ProfileRow>(
            r#"
            UPDATE profiles
            SET full_name = COALESCE($2, full_name),
                role = COALESCE($3, role)
            WHERE id = $1
            RETURNING id, email, full_name, role, created_at
            "#,
        )
        .bind(id)
        .bind(patch.display_name.as_deref())
        .bind(patch.role.map(|role| role.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::from)
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "profiles", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
