use std::sync::Arc;

use docvault_core::{AppError, FileRecord};
use docvault_db::FileStore;
use docvault_services::test_helpers::fixtures::{admin_actor, user_actor};
use docvault_services::test_helpers::{MockFileStore, MockStorage};
use docvault_services::{DeleteService, UploadFile, UploadService};

struct Harness {
    storage: MockStorage,
    files: MockFileStore,
    deleter: DeleteService,
}

async fn harness_with_record() -> (Harness, FileRecord) {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    let uploader = UploadService::new(Arc::new(storage.clone()), Arc::new(files.clone()));
    let report = uploader
        .upload(
            &admin_actor(),
            vec![UploadFile::new("contract.pdf", "application/pdf", b"%PDF".to_vec())],
        )
        .await
        .unwrap();
    let record = report.stored().next().unwrap().clone();

    let deleter = DeleteService::new(Arc::new(storage.clone()), Arc::new(files.clone()));
    (
        Harness {
            storage,
            files,
            deleter,
        },
        record,
    )
}

#[tokio::test]
async fn test_delete_removes_blob_and_record() {
    let (h, record) = harness_with_record().await;

    h.deleter.delete(&admin_actor(), &record).await.unwrap();

    assert!(!h.storage.has_object(&record.storage_path));
    let listing = h.files.list_all().await.unwrap();
    assert!(listing.iter().all(|r| r.id != record.id));
}

#[tokio::test]
async fn test_delete_twice_is_a_no_op() {
    let (h, record) = harness_with_record().await;
    let actor = admin_actor();

    h.deleter.delete(&actor, &record).await.unwrap();
    h.deleter.delete(&actor, &record).await.unwrap();

    assert!(h.files.is_empty());
}

#[tokio::test]
async fn test_blob_removal_failure_keeps_record() {
    let (h, record) = harness_with_record().await;
    h.storage.fail_removes(true);

    let err = h.deleter.delete(&admin_actor(), &record).await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert!(h.storage.has_object(&record.storage_path));
    assert_eq!(h.files.len(), 1);

    // Consistent state, so a retry goes through.
    h.storage.fail_removes(false);
    h.deleter.delete(&admin_actor(), &record).await.unwrap();
    assert!(h.files.is_empty());
}

#[tokio::test]
async fn test_record_failure_after_blob_removal_leaves_dangling_record() {
    let (h, record) = harness_with_record().await;
    h.files.fail_deletes(true);

    let err = h.deleter.delete(&admin_actor(), &record).await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
    assert!(!h.storage.has_object(&record.storage_path));
    assert_eq!(h.files.len(), 1);

    h.files.fail_deletes(false);
    h.deleter.delete(&admin_actor(), &record).await.unwrap();
    assert!(h.files.is_empty());
}

#[tokio::test]
async fn test_non_admin_cannot_delete() {
    let (h, record) = harness_with_record().await;

    let err = h.deleter.delete(&user_actor(), &record).await.unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(h.storage.has_object(&record.storage_path));
    assert_eq!(h.files.len(), 1);
}
