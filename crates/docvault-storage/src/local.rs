//! Local filesystem backend.
//!
//! Objects live under `base_path/{storage_path}`. Read links are HMAC-SHA256 signed:
//! `{base_url}/{storage_path}?expires={unix_secs}&nonce={uuid}&signature={b64url}`,
//! where the MAC covers `storage_path \n expires \n nonce`. Whatever serves
//! `base_url` checks links with [`LocalStorage::verify_link`].

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
    signing_secret: Vec<u8>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory standing in for the bucket (e.g., "/var/lib/docvault/documents")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8080/documents")
    /// * `signing_secret` - HMAC key for read links
    pub async fn new(
        base_path: impl Into<PathBuf>,
        base_url: String,
        signing_secret: Vec<u8>,
    ) -> StorageResult<Self> {
        let base_path = base_path.into();

        if signing_secret.is_empty() {
            return Err(StorageError::ConfigError(
                "Link signing secret must not be empty".to_string(),
            ));
        }

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
            signing_secret,
        })
    }

    fn key_to_path(&self, storage_path: &str) -> StorageResult<PathBuf> {
        validate_key(storage_path)?;
        Ok(self.base_path.join(storage_path))
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn mac(&self) -> StorageResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.signing_secret)
            .map_err(|e| StorageError::ConfigError(format!("Invalid signing secret: {}", e)))
    }

    fn link_signature(&self, storage_path: &str, expires: u64, nonce: &str) -> StorageResult<String> {
        let mut mac = self.mac()?;
        mac.update(signing_payload(storage_path, expires, nonce).as_bytes());
        let tag = mac.finalize().into_bytes();
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(tag))
    }

    /// Check a link's query parameters against `storage_path`.
    ///
    /// Fails with `SignFailed` when the signature does not match or the link has expired.
    pub fn verify_link(
        &self,
        storage_path: &str,
        expires: u64,
        nonce: &str,
        signature: &str,
    ) -> StorageResult<()> {
        let invalid = || StorageError::SignFailed("Invalid link signature".to_string());

        let tag = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| invalid())?;
        let mut mac = self.mac()?;
        mac.update(signing_payload(storage_path, expires, nonce).as_bytes());
        mac.verify_slice(&tag).map_err(|_| invalid())?;

        if unix_now() > expires {
            return Err(StorageError::SignFailed("Link has expired".to_string()));
        }
        Ok(())
    }

    fn link_url(&self, storage_path: &str) -> String {
        let encoded = storage_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url.trim_end_matches('/'), encoded)
    }
}

fn signing_payload(storage_path: &str, expires: u64, nonce: &str) -> String {
    format!("{}\n{}\n{}", storage_path, expires, nonce)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[async_trait]
impl Storage for LocalStorage {
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    async fn put(
        &self,
        storage_path: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_path)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::Conflict(storage_path.to_string()),
                _ => StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )),
            })?;

        let written = match file.write_all(&data).await {
            Ok(()) => file.sync_all().await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            // A half-written object must not occupy the path.
            let _ = fs::remove_file(&path).await;
            return Err(StorageError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            )));
        }

        tracing::info!(
            path = %path.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(count = storage_paths.len()))]
    async fn remove(&self, storage_paths: &[String]) -> StorageResult<()> {
        for storage_path in storage_paths {
            let path = self.key_to_path(storage_path)?;
            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Local storage object removed");
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Local storage object already absent");
                }
                Err(e) => {
                    return Err(StorageError::DeleteFailed(format!(
                        "Failed to delete file {}: {}",
                        path.display(),
                        e
                    )));
                }
            }
        }
        Ok(())
    }

    async fn sign(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String> {
        if !self.exists(storage_path).await? {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }

        let expires = unix_now().saturating_add(expires_in.as_secs());
        let nonce = Uuid::new_v4().simple().to_string();
        let signature = self.link_signature(storage_path, expires, &nonce)?;

        Ok(format!(
            "{}?expires={}&nonce={}&signature={}",
            self.link_url(storage_path),
            expires,
            nonce,
            signature
        ))
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_path)?;
        // Owner prefixes are directories here, not objects.
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
