use std::sync::Arc;

use docvault_core::{AppError, Category};
use docvault_services::test_helpers::fixtures::{admin_actor, user_actor};
use docvault_services::test_helpers::{MockFileStore, MockStorage};
use docvault_services::{FileOutcome, UploadFile, UploadService};

fn service(storage: &MockStorage, files: &MockFileStore) -> UploadService {
    UploadService::new(Arc::new(storage.clone()), Arc::new(files.clone()))
}

#[tokio::test]
async fn test_upload_pdf_produces_classified_owner_scoped_record() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    let actor = admin_actor();

    let report = service(&storage, &files)
        .upload(
            &actor,
            vec![UploadFile::new("report.pdf", "application/pdf", vec![0u8; 2048])],
        )
        .await
        .unwrap();

    assert!(report.is_complete());
    let record = report.stored().next().unwrap();
    assert_eq!(record.category, Category::Pdf);
    assert_eq!(record.size_bytes, 2048);
    assert_eq!(record.owner_id, Some(actor.id));
    assert!(record.storage_path.starts_with(&format!("{}/", actor.id)));
    assert!(record.storage_path.ends_with(".pdf"));

    assert_eq!(storage.get_object(&record.storage_path).unwrap().len(), 2048);
    assert_eq!(
        storage.content_type(&record.storage_path).as_deref(),
        Some("application/pdf")
    );

    let listing = report.listing.as_ref().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].id, record.id);
}

#[tokio::test]
async fn test_blob_failure_only_affects_its_own_file() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    storage.fail_put_call(2);

    let report = service(&storage, &files)
        .upload(
            &admin_actor(),
            vec![
                UploadFile::new("one.txt", "text/plain", b"1".to_vec()),
                UploadFile::new("two.txt", "text/plain", b"2".to_vec()),
                UploadFile::new("three.txt", "text/plain", b"3".to_vec()),
            ],
        )
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].is_stored());
    assert!(matches!(
        &report.outcomes[1],
        FileOutcome::BlobWriteFailed { file_name, error: AppError::Transport(_), .. } if file_name == "two.txt"
    ));
    assert!(report.outcomes[2].is_stored());
    assert!(report.orphan_paths().is_empty());

    // No row and no success entry for the failed file.
    assert_eq!(files.len(), 2);
    assert_eq!(storage.object_count(), 2);
    let names: Vec<_> = files.snapshot().into_iter().map(|r| r.name).collect();
    assert!(!names.contains(&"two.txt".to_string()));
    assert_eq!(report.listing.as_ref().unwrap().len(), 2);
}

#[tokio::test]
async fn test_metadata_failure_reports_orphaned_blob() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    files.fail_insert_call(1);

    let report = service(&storage, &files)
        .upload(
            &admin_actor(),
            vec![
                UploadFile::new("lost.docx", "application/msword", b"doc".to_vec()),
                UploadFile::new("kept.png", "image/png", b"png".to_vec()),
            ],
        )
        .await
        .unwrap();

    let orphans = report.orphan_paths();
    assert_eq!(orphans.len(), 1);
    assert!(orphans[0].ends_with(".docx"));
    // The orphan stays in the bucket; nothing cleans it up.
    assert!(storage.has_object(orphans[0]));
    assert!(matches!(
        &report.outcomes[0],
        FileOutcome::MetadataInsertFailed { file_name, .. } if file_name == "lost.docx"
    ));

    let listing = report.listing.as_ref().unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].name, "kept.png");
    assert_eq!(listing[0].category, Category::Image);
}

#[tokio::test]
async fn test_non_admin_cannot_upload() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();

    let err = service(&storage, &files)
        .upload(
            &user_actor(),
            vec![UploadFile::new("a.txt", "text/plain", b"a".to_vec())],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert_eq!(storage.object_count(), 0);
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_blank_name_is_rejected_before_any_write() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();

    let report = service(&storage, &files)
        .upload(
            &admin_actor(),
            vec![
                UploadFile::new("   ", "text/plain", b"a".to_vec()),
                UploadFile::new("b.txt", "text/plain", b"b".to_vec()),
            ],
        )
        .await
        .unwrap();

    assert!(matches!(
        &report.outcomes[0],
        FileOutcome::Rejected { error: AppError::Validation(_), .. }
    ));
    assert!(report.outcomes[1].is_stored());
    assert_eq!(storage.object_count(), 1);
    assert_eq!(report.failures().count(), 1);
}

#[tokio::test]
async fn test_tags_and_description_are_normalized() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();

    let report = service(&storage, &files)
        .upload(
            &admin_actor(),
            vec![
                UploadFile::new("q3.xlsx", "", b"xl".to_vec())
                    .with_description("   ")
                    .with_tag_input(" finance, ,q3 ,"),
            ],
        )
        .await
        .unwrap();

    let record = report.stored().next().unwrap();
    assert_eq!(record.tags, vec!["finance".to_string(), "q3".to_string()]);
    assert_eq!(record.description, None);
    // No declared type: classified by extension, stored with the generic type.
    assert_eq!(record.category, Category::Excel);
    assert_eq!(
        storage.content_type(&record.storage_path).as_deref(),
        Some("application/octet-stream")
    );
}

#[tokio::test]
async fn test_listing_refresh_failure_keeps_stored_files() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    files.fail_list(true);

    let report = service(&storage, &files)
        .upload(
            &admin_actor(),
            vec![UploadFile::new("a.md", "text/markdown", b"# a".to_vec())],
        )
        .await
        .unwrap();

    assert!(report.is_complete());
    assert!(matches!(report.listing, Err(AppError::Transport(_))));
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_listing_is_newest_first_and_includes_earlier_records() {
    let storage = MockStorage::new();
    let files = MockFileStore::new();
    let service = service(&storage, &files);
    let actor = admin_actor();

    service
        .upload(&actor, vec![UploadFile::new("old.txt", "text/plain", b"o".to_vec())])
        .await
        .unwrap();
    let report = service
        .upload(&actor, vec![UploadFile::new("new.txt", "text/plain", b"n".to_vec())])
        .await
        .unwrap();

    let names: Vec<_> = report
        .listing
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["new.txt", "old.txt"]);
}
