use std::sync::Arc;

use chrono::{Duration, Utc};
use docvault_core::{AppError, ProfilePatch, Role};
use docvault_services::test_helpers::fixtures::{admin_actor, create_test_profile, user_actor};
use docvault_services::test_helpers::{MockIdentity, MockProfileStore};
use docvault_services::{AccountService, ProvisionRequest};
use uuid::Uuid;

fn service() -> (MockProfileStore, MockIdentity, AccountService) {
    let profiles = MockProfileStore::new();
    let identity = MockIdentity::with_profiles(profiles.clone());
    let service =
        AccountService::new(Arc::new(profiles.clone())).with_identity(Arc::new(identity.clone()));
    (profiles, identity, service)
}

fn request(email: &str, password: &str, display_name: &str) -> ProvisionRequest {
    ProvisionRequest {
        email: email.to_string(),
        password: password.to_string(),
        display_name: display_name.to_string(),
        role: Role::User,
    }
}

#[tokio::test]
async fn test_list_profiles_newest_first() {
    let (profiles, _, service) = service();
    let mut older = create_test_profile("old@example.com", Role::Admin);
    older.created_at = Utc::now() - Duration::days(1);
    profiles.seed(older);
    profiles.seed(create_test_profile("new@example.com", Role::User));

    let listed = service.list_profiles(&admin_actor()).await.unwrap();

    let emails: Vec<_> = listed.iter().map(|p| p.email.as_str()).collect();
    assert_eq!(emails, vec!["new@example.com", "old@example.com"]);
}

#[tokio::test]
async fn test_provision_creates_account_and_profile() {
    let (profiles, identity, service) = service();

    let pending = service
        .provision(&admin_actor(), request(" ana@example.com ", "s3cret!", "Ana"))
        .await
        .unwrap();

    assert_eq!(pending.email, "ana@example.com");
    assert!(identity.has_account("ana@example.com"));
    assert!(profiles.contains(pending.account_id));
}

#[tokio::test]
async fn test_provision_requires_all_fields() {
    let (_, identity, service) = service();
    let actor = admin_actor();

    for req in [
        request("", "pw", "Ana"),
        request("ana@example.com", "", "Ana"),
        request("ana@example.com", "pw", "  "),
    ] {
        let err = service.provision(&actor, req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
    assert!(!identity.has_account("ana@example.com"));
}

#[tokio::test]
async fn test_update_profile_changes_role() {
    let (profiles, _, service) = service();
    let profile = create_test_profile("bo@example.com", Role::User);
    let id = profile.id;
    profiles.seed(profile);

    let updated = service
        .update_profile(
            &admin_actor(),
            id,
            ProfilePatch {
                display_name: None,
                role: Some(Role::Admin),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.role, Role::Admin);
    assert_eq!(updated.display_name, "bo");
}

#[tokio::test]
async fn test_update_profile_rejects_empty_patch_and_missing_profile() {
    let (_, _, service) = service();
    let actor = admin_actor();

    let err = service
        .update_profile(&actor, Uuid::new_v4(), ProfilePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let err = service
        .update_profile(
            &actor,
            Uuid::new_v4(),
            ProfilePatch {
                display_name: Some("Cy".to_string()),
                role: None,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_profile_is_idempotent() {
    let (profiles, _, service) = service();
    let profile = create_test_profile("di@example.com", Role::User);
    let id = profile.id;
    profiles.seed(profile);
    let actor = admin_actor();

    service.remove_profile(&actor, id).await.unwrap();
    service.remove_profile(&actor, id).await.unwrap();

    assert!(!profiles.contains(id));
}

#[tokio::test]
async fn test_provision_without_identity_provider_is_config_error() {
    let service = AccountService::new(Arc::new(MockProfileStore::new()));

    let err = service
        .provision(&admin_actor(), request("a@example.com", "pw", "A"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Config(_)));
}

#[tokio::test]
async fn test_account_administration_requires_admin() {
    let (_, _, service) = service();
    let actor = user_actor();

    assert!(matches!(
        service.list_profiles(&actor).await.unwrap_err(),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        service
            .provision(&actor, request("e@example.com", "pw", "E"))
            .await
            .unwrap_err(),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        service.remove_profile(&actor, Uuid::new_v4()).await.unwrap_err(),
        AppError::Forbidden(_)
    ));
}
