//! Mock Storage implementation for testing

use async_trait::async_trait;
use docvault_storage::{Storage, StorageBackend, StorageError, StorageResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Mock storage implementation that stores objects in memory
#[derive(Clone, Default)]
pub struct MockStorage {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    put_calls: Arc<Mutex<usize>>,
    failing_puts: Arc<Mutex<HashSet<usize>>>,
    fail_removes: Arc<Mutex<bool>>,
    fail_signing: Arc<Mutex<bool>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`-th call to `put` (1-based, counted across the mock's lifetime) fail.
    pub fn fail_put_call(&self, n: usize) {
        self.failing_puts.lock().unwrap().insert(n);
    }

    pub fn fail_removes(&self, fail: bool) {
        *self.fail_removes.lock().unwrap() = fail;
    }

    pub fn fail_signing(&self, fail: bool) {
        *self.fail_signing.lock().unwrap() = fail;
    }

    /// Set an object directly, bypassing `put`
    pub fn set_object(&self, path: &str, data: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            path.to_string(),
            StoredObject {
                data,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Check if an object exists in the mock storage
    pub fn has_object(&self, path: &str) -> bool {
        self.objects.lock().unwrap().contains_key(path)
    }

    /// Get object data (for test assertions)
    pub fn get_object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(path).map(|o| o.data.clone())
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(path)
            .map(|o| o.content_type.clone())
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn put(&self, storage_path: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        let call = {
            let mut calls = self.put_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if self.failing_puts.lock().unwrap().contains(&call) {
            return Err(StorageError::UploadFailed(format!(
                "injected failure on put #{}",
                call
            )));
        }

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(storage_path) {
            return Err(StorageError::Conflict(storage_path.to_string()));
        }
        objects.insert(
            storage_path.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, storage_paths: &[String]) -> StorageResult<()> {
        if *self.fail_removes.lock().unwrap() {
            return Err(StorageError::DeleteFailed("injected failure".to_string()));
        }
        let mut objects = self.objects.lock().unwrap();
        for path in storage_paths {
            objects.remove(path);
        }
        Ok(())
    }

    async fn sign(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String> {
        if *self.fail_signing.lock().unwrap() {
            return Err(StorageError::SignFailed("injected failure".to_string()));
        }
        if !self.objects.lock().unwrap().contains_key(storage_path) {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }
        Ok(format!(
            "https://storage.test/documents/{}?expires_in={}&token={}",
            storage_path,
            expires_in.as_secs(),
            Uuid::new_v4().simple()
        ))
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        Ok(self.objects.lock().unwrap().contains_key(storage_path))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
