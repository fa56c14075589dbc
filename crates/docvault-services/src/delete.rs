//! Delete orchestrator
//!
//! Blob first, then row. If the blob removal fails the row still describes an
//! existing blob and the delete can be retried. If the row delete fails after the
//! blob is gone, the row dangles; that is logged for manual reconciliation.

use std::sync::Arc;

use docvault_core::{Actor, AppError, FileRecord};
use docvault_db::FileStore;
use docvault_storage::{Storage, StorageError};

pub struct DeleteService {
    storage: Arc<dyn Storage>,
    files: Arc<dyn FileStore>,
}

impl DeleteService {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn FileStore>) -> Self {
        Self { storage, files }
    }

    /// Delete a record and its blob. Deleting something already gone succeeds.
    #[tracing::instrument(skip(self, record), fields(record_id = %record.id, storage_path = %record.storage_path))]
    pub async fn delete(&self, actor: &Actor, record: &FileRecord) -> Result<(), AppError> {
        actor.require_admin("delete files")?;

        match self
            .storage
            .remove(std::slice::from_ref(&record.storage_path))
            .await
        {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Blob removal failed, record left in place");
                return Err(e.into());
            }
        }

        match self.files.delete_by_id(record.id).await {
            Ok(true) => {
                tracing::info!("File deleted");
                Ok(())
            }
            Ok(false) => {
                tracing::debug!("File record already absent");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    reconciliation = "dangling_record",
                    "Record delete failed after blob removal; record references a missing blob"
                );
                Err(e)
            }
        }
    }
}
