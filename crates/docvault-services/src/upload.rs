//! Upload orchestrator
//!
//! Per file, strictly in batch order: classify, generate a fresh storage path,
//! write the blob, insert the metadata row. A failure only aborts the file it
//! happened on. After the batch the listing is re-read from the metadata store.

use std::sync::Arc;
use std::time::Instant;

use docvault_core::validation::{normalize_description, normalize_tags, parse_tags, validate_name};
use docvault_core::{classify, Actor, AppError, FileRecord, NewFileRecord};
use docvault_db::FileStore;
use docvault_storage::{generate_storage_path, Storage};
use uuid::Uuid;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// One file of an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Vec<u8>,
    /// MIME type reported by the client; may be empty.
    pub declared_type: String,
    pub file_name: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, declared_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            data,
            declared_type: declared_type.into(),
            file_name: file_name.into(),
            description: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Tags as typed in the upload form: comma separated.
    pub fn with_tag_input(mut self, input: &str) -> Self {
        self.tags = parse_tags(input);
        self
    }
}

/// What happened to one file of the batch.
#[derive(Debug)]
pub enum FileOutcome {
    Stored(FileRecord),
    /// Failed validation; nothing was written.
    Rejected { file_name: String, error: AppError },
    /// The blob write failed; no metadata row was attempted.
    BlobWriteFailed {
        file_name: String,
        storage_path: String,
        error: AppError,
    },
    /// The blob was written but the row insert failed. The blob at
    /// `orphan_path` is referenced by nothing and is left for manual cleanup.
    MetadataInsertFailed {
        file_name: String,
        orphan_path: String,
        error: AppError,
    },
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            FileOutcome::Stored(record) => &record.name,
            FileOutcome::Rejected { file_name, .. }
            | FileOutcome::BlobWriteFailed { file_name, .. }
            | FileOutcome::MetadataInsertFailed { file_name, .. } => file_name,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, FileOutcome::Stored(_))
    }

    pub fn error(&self) -> Option<&AppError> {
        match self {
            FileOutcome::Stored(_) => None,
            FileOutcome::Rejected { error, .. }
            | FileOutcome::BlobWriteFailed { error, .. }
            | FileOutcome::MetadataInsertFailed { error, .. } => Some(error),
        }
    }
}

/// Result of an upload batch: one outcome per input file, in input order, plus
/// the refreshed listing.
#[derive(Debug)]
pub struct UploadReport {
    pub outcomes: Vec<FileOutcome>,
    /// Full listing read back after the batch. A failed refresh does not undo
    /// any stored file.
    pub listing: Result<Vec<FileRecord>, AppError>,
}

impl UploadReport {
    pub fn stored(&self) -> impl Iterator<Item = &FileRecord> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            FileOutcome::Stored(record) => Some(record),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_stored())
    }

    /// Blob paths left without a metadata row by this batch.
    pub fn orphan_paths(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                FileOutcome::MetadataInsertFailed { orphan_path, .. } => Some(orphan_path.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_stored)
    }
}

pub struct UploadService {
    storage: Arc<dyn Storage>,
    files: Arc<dyn FileStore>,
}

impl UploadService {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn FileStore>) -> Self {
        Self { storage, files }
    }

    /// Upload a batch on behalf of `actor`, who becomes the owner of every record.
    ///
    /// Only fails as a whole when the actor is not an administrator; per-file
    /// failures are reported in the returned outcomes.
    #[tracing::instrument(skip(self, files), fields(owner_id = %actor.id, batch_size = files.len()))]
    pub async fn upload(&self, actor: &Actor, files: Vec<UploadFile>) -> Result<UploadReport, AppError> {
        actor.require_admin("upload files")?;

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            outcomes.push(self.upload_one(actor.id, file).await);
        }

        let stored = outcomes.iter().filter(|o| o.is_stored()).count();
        tracing::info!(
            stored,
            failed = outcomes.len() - stored,
            "Upload batch finished"
        );

        let listing = self.files.list_all().await;
        if let Err(e) = &listing {
            tracing::warn!(error = %e, "Failed to refresh file listing after upload");
        }

        Ok(UploadReport { outcomes, listing })
    }

    async fn upload_one(&self, owner_id: Uuid, file: UploadFile) -> FileOutcome {
        let UploadFile {
            data,
            declared_type,
            file_name,
            description,
            tags,
        } = file;

        let name = match validate_name(&file_name) {
            Ok(name) => name,
            Err(error) => return FileOutcome::Rejected { file_name, error },
        };

        let category = classify(&declared_type, &name);
        let storage_path = generate_storage_path(owner_id, &name);
        let size_bytes = data.len() as i64;
        let content_type = match declared_type.trim() {
            "" => FALLBACK_CONTENT_TYPE,
            declared => declared,
        };

        let start = Instant::now();
        if let Err(e) = self.storage.put(&storage_path, data, content_type).await {
            let error = AppError::from(e);
            tracing::error!(
                error = %error,
                storage_path = %storage_path,
                file_name = %name,
                "Blob write failed, skipping metadata insert"
            );
            return FileOutcome::BlobWriteFailed {
                file_name: name,
                storage_path,
                error,
            };
        }

        let new_record = NewFileRecord {
            name: name.clone(),
            description: normalize_description(description.as_deref()),
            tags: normalize_tags(tags),
            storage_path: storage_path.clone(),
            category,
            size_bytes,
            owner_id: Some(owner_id),
        };

        match self.files.insert(new_record).await {
            Ok(record) => {
                tracing::info!(
                    record_id = %record.id,
                    storage_path = %storage_path,
                    category = %category,
                    size_bytes,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "File uploaded"
                );
                FileOutcome::Stored(record)
            }
            Err(error) => {
                tracing::error!(
                    error = %error,
                    storage_path = %storage_path,
                    owner_id = %owner_id,
                    reconciliation = "orphan_blob",
                    "Metadata insert failed after blob write; blob is orphaned"
                );
                FileOutcome::MetadataInsertFailed {
                    file_name: name,
                    orphan_path: storage_path,
                    error,
                }
            }
        }
    }
}
