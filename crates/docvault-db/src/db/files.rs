use async_trait::async_trait;
use chrono::{DateTime, Utc};
use docvault_core::{AppError, Category, FilePatch, FileRecord, NewFileRecord};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::traits::FileStore;

const FILE_COLUMNS: &str = "id, name, description, tags, file_path, file_type, file_size, \
                            uploaded_by, created_at, updated_at";

/// `files` row as stored. Category is kept as text so rows written with an
/// unknown tag still load (as `other`).
#[derive(Debug, FromRow)]
struct FileRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    tags: Vec<String>,
    file_path: String,
    file_type: String,
    file_size: i64,
    uploaded_by: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FileRow> for FileRecord {
    fn from(row: FileRow) -> Self {
        FileRecord {
            id: row.id,
            name: row.name,
            description: row.description,
            tags: row.tags,
            storage_path: row.file_path,
            category: Category::from_stored(&row.file_type),
            size_bytes: row.file_size,
            owner_id: row.uploaded_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
            signed_url: None,
        }
    }
}

/// Repository for the `files` table
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    #[tracing::instrument(
        skip(self, record),
        fields(db.table = "files", db.operation = "insert", storage_path = %record.storage_path)
    )]
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            INSERT INTO files (name, description, tags, file_path, file_type, file_size, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(&record.name)
        .bind(&record.description)
        .bind(&record.tags)
        .bind(&record.storage_path)
        .bind(record.category.as_str())
        .bind(record.size_bytes)
        .bind(record.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<FileRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files ORDER BY created_at DESC",
            FILE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FileRecord::from).collect())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            "SELECT {} FROM files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(FileRecord::from))
    }

    #[tracing::instrument(skip(self, patch), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    async fn update_fields(&self, id: Uuid, patch: &FilePatch) -> Result<FileRecord, AppError> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "Update must change at least one field".to_string(),
            ));
        }

        // $3 distinguishes "leave description alone" from "clear it".
        let row = sqlx::query_as::<Postgres, FileRow>(&format!(
            r#"
            UPDATE files
            SET name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.description.is_some())
        .bind(patch.description.clone().flatten())
        .fetch_optional(&self.pool)
        .await?;

        row.map(FileRecord::from)
            .ok_or_else(|| AppError::NotFound(format!("File record {} not found", id)))
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(file_type: &str) -> FileRow {
        let now = Utc::now();
        FileRow {
            id: Uuid::new_v4(),
            name: "report.pdf".to_string(),
            description: None,
            tags: vec!["finance".to_string()],
            file_path: "owner/1_x.pdf".to_string(),
            file_type: file_type.to_string(),
            file_size: 2048,
            uploaded_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_maps_onto_record() {
        let record = FileRecord::from(row("pdf"));
        assert_eq!(record.category, Category::Pdf);
        assert_eq!(record.storage_path, "owner/1_x.pdf");
        assert_eq!(record.size_bytes, 2048);
        assert!(record.signed_url.is_none());
    }

    #[test]
    fn test_unknown_stored_category_loads_as_other() {
        let record = FileRecord::from(row("spreadsheet-ish"));
        assert_eq!(record.category, Category::Other);
    }
}
