use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;

/// One uploaded document: the metadata row describing a blob in the bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: Uuid,
    /// Display filename; never empty.
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    /// Blob location; unique and immutable after creation.
    pub storage_path: String,
    pub category: Category,
    pub size_bytes: i64,
    /// Uploading account; null once that account is gone.
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Time-limited access link. Only ever set on an in-memory copy, never persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_url: Option<String>,
}

impl FileRecord {
    /// Copy of this record carrying a freshly issued access link.
    pub fn with_signed_url(&self, url: String) -> FileRecord {
        FileRecord {
            signed_url: Some(url),
            ..self.clone()
        }
    }
}

/// Fields supplied when registering a freshly written blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFileRecord {
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub storage_path: String,
    pub category: Category,
    pub size_bytes: i64,
    pub owner_id: Option<Uuid>,
}

/// Partial update of a record's mutable metadata.
///
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

impl FilePatch {
    pub fn rename(name: impl Into<String>) -> Self {
        FilePatch {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn redescribe(description: Option<String>) -> Self {
        FilePatch {
            description: Some(description),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}
