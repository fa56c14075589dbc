//! Mock repository implementations for testing

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use docvault_core::{AppError, FilePatch, FileRecord, NewFileRecord, Profile, ProfilePatch};
use docvault_db::{FileStore, ProfileStore};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct FileState {
    records: Vec<FileRecord>,
    insert_calls: usize,
    failing_inserts: HashSet<usize>,
    fail_list: bool,
    fail_deletes: bool,
    fail_updates: bool,
}

/// In-memory `files` table. Each insert gets a `created_at` one millisecond
/// after the previous one so listing order is deterministic.
#[derive(Clone)]
pub struct MockFileStore {
    state: Arc<Mutex<FileState>>,
    epoch: DateTime<Utc>,
}

impl Default for MockFileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FileState::default())),
            epoch: Utc::now(),
        }
    }

    /// Make the `n`-th call to `insert` (1-based) fail with a transport error.
    pub fn fail_insert_call(&self, n: usize) {
        self.state.lock().unwrap().failing_inserts.insert(n);
    }

    pub fn fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state.lock().unwrap().fail_updates = fail;
    }

    /// Insert a record directly, bypassing `insert`
    pub fn seed(&self, record: FileRecord) {
        self.state.lock().unwrap().records.push(record);
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn snapshot(&self) -> Vec<FileRecord> {
        self.state.lock().unwrap().records.clone()
    }
}

#[async_trait]
impl FileStore for MockFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let mut state = self.state.lock().unwrap();
        state.insert_calls += 1;
        let call = state.insert_calls;
        if state.failing_inserts.contains(&call) {
            return Err(AppError::Transport(format!(
                "injected failure on insert #{}",
                call
            )));
        }
        if state
            .records
            .iter()
            .any(|r| r.storage_path == record.storage_path)
        {
            return Err(AppError::Conflict(format!(
                "Duplicate storage path {}",
                record.storage_path
            )));
        }

        let created_at = self.epoch + Duration::milliseconds(call as i64);
        let stored = FileRecord {
            id: Uuid::new_v4(),
            name: record.name,
            description: record.description,
            tags: record.tags,
            storage_path: record.storage_path,
            category: record.category,
            size_bytes: record.size_bytes,
            owner_id: record.owner_id,
            created_at,
            updated_at: created_at,
            signed_url: None,
        };
        state.records.push(stored.clone());
        Ok(stored)
    }

    async fn list_all(&self) -> Result<Vec<FileRecord>, AppError> {
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(AppError::Transport("injected failure on list".to_string()));
        }
        let mut records = state.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<FileRecord>, AppError> {
        let state = self.state.lock().unwrap();
        Ok(state.records.iter().find(|r| r.id == id).cloned())
    }

    async fn update_fields(&self, id: Uuid, patch: &FilePatch) -> Result<FileRecord, AppError> {
        if patch.is_empty() {
            return Err(AppError::Validation(
                "Update must change at least one field".to_string(),
            ));
        }
        let mut state = self.state.lock().unwrap();
        if state.fail_updates {
            return Err(AppError::Transport("injected failure on update".to_string()));
        }
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| AppError::NotFound(format!("File record {} not found", id)))?;

        if let Some(name) = &patch.name {
            record.name = name.clone();
        }
        if let Some(description) = &patch.description {
            record.description = description.clone();
        }
        record.updated_at = Utc::now().max(record.updated_at + Duration::milliseconds(1));
        Ok(record.clone())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(AppError::Transport("injected failure on delete".to_string()));
        }
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        Ok(state.records.len() < before)
    }
}

/// In-memory `profiles` table
#[derive(Clone, Default)]
pub struct MockProfileStore {
    profiles: Arc<Mutex<HashMap<Uuid, Profile>>>,
}

impl MockProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, profile: Profile) {
        self.profiles.lock().unwrap().insert(profile.id, profile);
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.profiles.lock().unwrap().contains_key(&id)
    }
}

#[async_trait]
impl ProfileStore for MockProfileStore {
    async fn get(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, AppError> {
        let mut profiles: Vec<Profile> = self.profiles.lock().unwrap().values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn update(&self, id: Uuid, patch: &ProfilePatch) -> Result<Profile, AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))?;
        if let Some(name) = &patch.display_name {
            profile.display_name = name.clone();
        }
        if let Some(role) = patch.role {
            profile.role = role;
        }
        Ok(profile.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.profiles.lock().unwrap().remove(&id).is_some())
    }
}
