//! Access-link issuer
//!
//! Links are requested on demand for a single view or download and never cached;
//! every call signs a new one. Expiry is enforced by the storage side.

use std::sync::Arc;

use docvault_core::constants::access_url_ttl;
use docvault_core::{AppError, FileRecord};
use docvault_storage::Storage;

pub struct AccessLinkService {
    storage: Arc<dyn Storage>,
}

impl AccessLinkService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Signed read URL for `storage_path`, valid for one hour.
    #[tracing::instrument(skip(self))]
    pub async fn access_url(&self, storage_path: &str) -> Result<String, AppError> {
        let url = self.storage.sign(storage_path, access_url_ttl()).await?;
        tracing::debug!("Access link issued");
        Ok(url)
    }

    /// Copy of `record` with `signed_url` filled in, for the viewer.
    pub async fn attach(&self, record: &FileRecord) -> Result<FileRecord, AppError> {
        let url = self.access_url(&record.storage_path).await?;
        Ok(record.with_signed_url(url))
    }
}
