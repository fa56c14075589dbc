//! Record mutation service
//!
//! Metadata-only edits. The blob is never touched and `updated_at` is set by the
//! store. [`reconcile_update`] and [`reconcile_removal`] patch a caller-owned
//! listing after a successful write.

use std::sync::Arc;

use docvault_core::validation::{normalize_description, validate_name};
use docvault_core::{Actor, AppError, FilePatch, FileRecord};
use docvault_db::FileStore;
use uuid::Uuid;

pub struct MutationService {
    files: Arc<dyn FileStore>,
}

impl MutationService {
    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }

    /// Rename a record. The name is trimmed; a blank name fails before any store call.
    #[tracing::instrument(skip(self, new_name), fields(record_id = %id))]
    pub async fn rename(&self, actor: &Actor, id: Uuid, new_name: &str) -> Result<FileRecord, AppError> {
        actor.require_admin("rename files")?;
        let name = validate_name(new_name)?;

        let record = self.files.update_fields(id, &FilePatch::rename(name)).await?;
        tracing::info!(name = %record.name, "File renamed");
        Ok(record)
    }

    /// Replace a record's description. Blank clears it.
    #[tracing::instrument(skip(self, new_description), fields(record_id = %id))]
    pub async fn redescribe(
        &self,
        actor: &Actor,
        id: Uuid,
        new_description: Option<&str>,
    ) -> Result<FileRecord, AppError> {
        actor.require_admin("edit file descriptions")?;

        let patch = FilePatch::redescribe(normalize_description(new_description));
        let record = self.files.update_fields(id, &patch).await?;
        tracing::info!("File description updated");
        Ok(record)
    }
}

/// Replace the record with the same id. Unknown ids leave the list unchanged.
pub fn reconcile_update(records: &mut [FileRecord], updated: &FileRecord) {
    if let Some(slot) = records.iter_mut().find(|r| r.id == updated.id) {
        *slot = updated.clone();
    }
}

/// Drop the record with this id, if present.
pub fn reconcile_removal(records: &mut Vec<FileRecord>, id: Uuid) {
    records.retain(|r| r.id != id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::fixtures::create_test_record;
    use docvault_core::Category;

    #[test]
    fn test_reconcile_update_replaces_in_place() {
        let mut records = vec![
            create_test_record("a.pdf", Category::Pdf, 10),
            create_test_record("b.txt", Category::Text, 20),
        ];
        let mut renamed = records[1].clone();
        renamed.name = "c.txt".to_string();

        reconcile_update(&mut records, &renamed);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "a.pdf");
        assert_eq!(records[1].name, "c.txt");
    }

    #[test]
    fn test_reconcile_update_ignores_unknown_record() {
        let mut records = vec![create_test_record("a.pdf", Category::Pdf, 10)];
        let stranger = create_test_record("x.pdf", Category::Pdf, 10);

        reconcile_update(&mut records, &stranger);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a.pdf");
    }

    #[test]
    fn test_reconcile_removal_is_idempotent() {
        let mut records = vec![
            create_test_record("a.pdf", Category::Pdf, 10),
            create_test_record("b.txt", Category::Text, 20),
        ];
        let id = records[0].id;

        reconcile_removal(&mut records, id);
        reconcile_removal(&mut records, id);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "b.txt");
    }
}
