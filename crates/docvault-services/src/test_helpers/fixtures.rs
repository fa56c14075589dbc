//! Test fixtures and helper functions for creating test data

use chrono::{Duration, Utc};
use docvault_core::{Actor, Category, FileRecord, Profile, Role};
use uuid::Uuid;

/// Create a test FileRecord owned by a random account
pub fn create_test_record(name: &str, category: Category, size_bytes: i64) -> FileRecord {
    let owner = Uuid::new_v4();
    let now = Utc::now();
    FileRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        tags: Vec::new(),
        storage_path: format!("{}/{}_{}", owner, now.timestamp_millis(), name),
        category,
        size_bytes,
        owner_id: Some(owner),
        created_at: now,
        updated_at: now,
        signed_url: None,
    }
}

/// Same as [`create_test_record`], created `minutes_ago` minutes in the past.
pub fn create_aged_record(name: &str, category: Category, size_bytes: i64, minutes_ago: i64) -> FileRecord {
    let mut record = create_test_record(name, category, size_bytes);
    record.created_at -= Duration::minutes(minutes_ago);
    record.updated_at = record.created_at;
    record
}

pub fn create_test_profile(email: &str, role: Role) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        email: email.to_string(),
        display_name: email.split('@').next().unwrap_or(email).to_string(),
        role,
        created_at: Utc::now(),
    }
}

pub fn admin_actor() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

pub fn user_actor() -> Actor {
    Actor::new(Uuid::new_v4(), Role::User)
}
