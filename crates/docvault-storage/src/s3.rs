use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStoreExt, PutMode, PutOptions, PutPayload,
    Result as ObjectResult,
};
use std::time::Duration;

/// S3 storage implementation
///
/// Works against AWS S3 and S3-compatible providers (MinIO, the Supabase Storage
/// S3 gateway) through `object_store`.
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS_* environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    fn location(storage_path: &str) -> StorageResult<Path> {
        validate_key(storage_path)?;
        Ok(Path::from(storage_path.to_string()))
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        storage_path: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let location = Self::location(storage_path)?;
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let opts = PutOptions {
            mode: PutMode::Create,
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = object_store::ObjectStore::put_opts(
            &self.store,
            &location,
            PutPayload::from(Bytes::from(data)),
            opts,
        )
        .await;

        result.map_err(|e| match e {
            ObjectStoreError::AlreadyExists { .. } | ObjectStoreError::Precondition { .. } => {
                StorageError::Conflict(storage_path.to_string())
            }
            other => {
                tracing::error!(
                    error = %other,
                    bucket = %self.bucket,
                    key = %storage_path,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(other.to_string())
            }
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_path,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn remove(&self, storage_paths: &[String]) -> StorageResult<()> {
        for storage_path in storage_paths {
            let location = Self::location(storage_path)?;
            let start = std::time::Instant::now();

            let result: ObjectResult<_> = self.store.delete(&location).await;
            match result {
                Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {
                    tracing::info!(
                        bucket = %self.bucket,
                        key = %storage_path,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 delete successful"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %storage_path,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 delete failed"
                    );
                    return Err(StorageError::DeleteFailed(e.to_string()));
                }
            }
        }
        Ok(())
    }

    async fn sign(&self, storage_path: &str, expires_in: Duration) -> StorageResult<String> {
        // Presigning never touches the bucket, so check for the object first.
        if !self.exists(storage_path).await? {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }

        let location = Self::location(storage_path)?;
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, expires_in)
            .await;

        let url = url_result
            .map_err(|e| StorageError::SignFailed(e.to_string()))?
            .to_string();

        Ok(url)
    }

    async fn exists(&self, storage_path: &str) -> StorageResult<bool> {
        let location = Self::location(storage_path)?;
        match self.store.head(&location).await {
            Ok(_) => Ok(true),
            Err(ObjectStoreError::NotFound { .. }) => Ok(false),
            Err(e) => Err(StorageError::BackendError(e.to_string())),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
