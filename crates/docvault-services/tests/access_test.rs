use std::sync::Arc;

use docvault_core::constants::ACCESS_URL_TTL_SECS;
use docvault_core::{AppError, Category};
use docvault_services::test_helpers::fixtures::create_test_record;
use docvault_services::test_helpers::MockStorage;
use docvault_services::AccessLinkService;

#[tokio::test]
async fn test_each_request_signs_a_fresh_link() {
    let storage = MockStorage::new();
    storage.set_object("owner/1_a.pdf", b"%PDF".to_vec());
    let links = AccessLinkService::new(Arc::new(storage));

    let first = links.access_url("owner/1_a.pdf").await.unwrap();
    let second = links.access_url("owner/1_a.pdf").await.unwrap();

    assert_ne!(first, second);
    assert!(first.contains(&format!("expires_in={}", ACCESS_URL_TTL_SECS)));
}

#[tokio::test]
async fn test_missing_blob_is_not_found() {
    let links = AccessLinkService::new(Arc::new(MockStorage::new()));

    let err = links.access_url("owner/gone.pdf").await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_signing_failure_is_transport_error() {
    let storage = MockStorage::new();
    storage.set_object("owner/1_a.pdf", b"%PDF".to_vec());
    storage.fail_signing(true);
    let links = AccessLinkService::new(Arc::new(storage));

    let err = links.access_url("owner/1_a.pdf").await.unwrap_err();

    assert!(matches!(err, AppError::Transport(_)));
}

#[tokio::test]
async fn test_attach_returns_copy_with_signed_url() {
    let storage = MockStorage::new();
    let record = create_test_record("photo.png", Category::Image, 512);
    storage.set_object(&record.storage_path, b"png".to_vec());
    let links = AccessLinkService::new(Arc::new(storage));

    let viewed = links.attach(&record).await.unwrap();

    assert!(record.signed_url.is_none());
    assert_eq!(viewed.id, record.id);
    let url = viewed.signed_url.as_deref().unwrap();
    assert!(url.contains(&record.storage_path));

    // Never persisted: the link is not part of the serialized record when absent.
    let json = serde_json::to_value(&record).unwrap();
    assert!(json.get("signed_url").is_none());
}
