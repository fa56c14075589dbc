//! Operator CLI support: wiring from configuration to services, plus the
//! formatting used by the plain-text listing.

use std::sync::Arc;

use anyhow::Context;
use docvault_core::{Actor, AppError, Config, FileRecord, Role};
use docvault_db::{setup_database, FileRepository, FileStore, ProfileRepository, ProfileStore};
use docvault_services::{
    AccessLinkService, AccountService, DeleteService, MutationService, UploadService,
};
use docvault_storage::{create_storage, Storage};
use uuid::Uuid;

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    pub files: Arc<dyn FileStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub uploads: UploadService,
    pub deletes: DeleteService,
    pub links: AccessLinkService,
    pub mutations: MutationService,
    pub accounts: AccountService,
}

impl AppContext {
    pub async fn connect(config: Config) -> anyhow::Result<Self> {
        let pool = setup_database(&config).await?;
        let storage = create_storage(&config)
            .await
            .context("Failed to initialize storage backend")?;
        tracing::info!(
            backend = %storage.backend_type(),
            bucket = %config.storage_bucket,
            "Storage backend ready"
        );

        let files: Arc<dyn FileStore> = Arc::new(FileRepository::new(pool.clone()));
        let profiles: Arc<dyn ProfileStore> = Arc::new(ProfileRepository::new(pool));
        Ok(Self::from_parts(config, storage, files, profiles))
    }

    pub fn from_parts(
        config: Config,
        storage: Arc<dyn Storage>,
        files: Arc<dyn FileStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            uploads: UploadService::new(storage.clone(), files.clone()),
            deletes: DeleteService::new(storage.clone(), files.clone()),
            links: AccessLinkService::new(storage.clone()),
            mutations: MutationService::new(files.clone()),
            accounts: AccountService::new(profiles.clone()),
            config,
            storage,
            files,
            profiles,
        }
    }

    /// The account the CLI acts as (`DOCVAULT_ACTOR_ID`). Without a profile row
    /// the account is treated as a read-only user.
    pub async fn actor(&self) -> anyhow::Result<Actor> {
        let id = self
            .config
            .actor_id
            .context("DOCVAULT_ACTOR_ID must be set for this command")?;
        let actor = match self.profiles.get(id).await? {
            Some(profile) => Actor::from(&profile),
            None => {
                tracing::warn!(account_id = %id, "No profile for actor, treating as read-only user");
                Actor::new(id, Role::User)
            }
        };
        Ok(actor)
    }

    pub async fn find_record(&self, id: Uuid) -> Result<FileRecord, AppError> {
        self.files
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File record {} not found", id)))
    }
}

/// Human-readable size: `512 B`, `1.5 KB`, `2 MB`.
pub fn format_size(bytes: i64) -> String {
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, SIZE_UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, SIZE_UNITS[unit])
    }
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Plain-text listing, one record per line.
pub fn render_table(records: &[FileRecord]) -> String {
    let mut out = format!(
        "{:<36}  {:<32}  {:<10}  {:>9}  {}\n",
        "ID", "NAME", "CATEGORY", "SIZE", "CREATED"
    );
    for record in records {
        out.push_str(&format!(
            "{:<36}  {:<32}  {:<10}  {:>9}  {}\n",
            record.id,
            truncate_string(&record.name, 32),
            record.category.as_str(),
            format_size(record.size_bytes),
            record.created_at.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}

/// Initialize tracing for the CLI. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("docvault=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docvault_core::Category;

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn format_size_stops_at_gigabytes() {
        assert_eq!(format_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("héllo wörld", 8), "héllo...");
    }

    #[test]
    fn render_table_lists_every_record() {
        let now = Utc::now();
        let record = FileRecord {
            id: Uuid::new_v4(),
            name: "Invoice.pdf".to_string(),
            description: None,
            tags: vec![],
            storage_path: "o/1_x.pdf".to_string(),
            category: Category::Pdf,
            size_bytes: 2048,
            owner_id: None,
            created_at: now,
            updated_at: now,
            signed_url: None,
        };

        let table = render_table(&[record.clone()]);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with(&record.id.to_string()));
        assert!(lines[1].contains("Invoice.pdf"));
        assert!(lines[1].contains("2 KB"));
        assert!(lines[1].contains("pdf"));
    }
}
