//! Configuration module
//!
//! Environment-driven settings for the metadata database, the object-storage
//! bucket and the operator tooling. Values are read once at start-up.

use std::env;

use uuid::Uuid;

use crate::constants::DEFAULT_BUCKET;
use crate::storage_types::StorageBackend;

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_SIGNING_SECRET_LEN: usize = 32;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub storage_bucket: String,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Supabase Storage S3 gateway, ...)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub local_url_signing_secret: Option<String>,
    /// Profile the operator CLI acts as.
    pub actor_id: Option<Uuid>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let db_max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .unwrap_or(MAX_CONNECTIONS);

        let db_timeout_seconds = env::var("DB_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(CONNECTION_TIMEOUT_SECS);

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let storage_bucket = env::var("STORAGE_BUCKET")
            .or_else(|_| env::var("S3_BUCKET"))
            .unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        let actor_id = match env::var("DOCVAULT_ACTOR_ID") {
            Ok(value) => Some(
                Uuid::parse_str(value.trim())
                    .map_err(|e| anyhow::anyhow!("DOCVAULT_ACTOR_ID is not a valid UUID: {}", e))?,
            ),
            Err(_) => None,
        };

        Ok(Config {
            environment,
            database_url,
            db_max_connections,
            db_timeout_seconds,
            storage_backend,
            storage_bucket,
            s3_region: env::var("S3_REGION").or_else(|_| env::var("AWS_REGION")).ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            local_url_signing_secret: env::var("LOCAL_URL_SIGNING_SECRET").ok(),
            actor_id,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.storage_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_BUCKET must not be empty"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
                let secret_len = self
                    .local_url_signing_secret
                    .as_deref()
                    .map(str::len)
                    .unwrap_or(0);
                if self.is_production() && secret_len < MIN_SIGNING_SECRET_LEN {
                    return Err(anyhow::anyhow!(
                        "LOCAL_URL_SIGNING_SECRET must be at least {} characters in production",
                        MIN_SIGNING_SECRET_LEN
                    ));
                }
            }
        }

        Ok(())
    }
}
