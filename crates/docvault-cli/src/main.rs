//! DocVault CLI: operator client for the document vault.
//!
//! Reads configuration from the environment (see `.env`). Mutating commands act
//! as the profile named by DOCVAULT_ACTOR_ID and require the admin role.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docvault_cli::{init_tracing, render_table, AppContext};
use docvault_core::{
    view, AppError, BrowseQuery, CategoryFilter, Config, ErrorMetadata, LogLevel, ProfilePatch,
    Role, SortDirection, SortField, SortSpec,
};
use docvault_services::{FileOutcome, UploadFile};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "docvault", about = "DocVault document management CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files, optionally filtered and sorted
    List {
        /// Text matched against name, description and tags
        #[arg(long, default_value = "")]
        search: String,
        /// Category filter: all, image, pdf, word, excel, powerpoint, text, zip, video, audio, other
        #[arg(long, default_value = "all")]
        category: String,
        /// Sort field: name, created_at, size, category
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Upload one or more files
    Upload {
        /// Paths of the files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Description applied to every file
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated tags applied to every file
        #[arg(long, default_value = "")]
        tags: String,
        /// Declared MIME type; when omitted the file extension decides the category
        #[arg(long, default_value = "")]
        content_type: String,
    },
    /// Print a signed access link (valid for one hour)
    Link {
        /// File record UUID
        id: Uuid,
    },
    /// Rename a file
    Rename {
        /// File record UUID
        id: Uuid,
        /// New display name
        name: String,
    },
    /// Set or clear a file's description
    Describe {
        /// File record UUID
        id: Uuid,
        /// New description; omit to clear
        description: Option<String>,
    },
    /// Delete a file and its stored blob
    Delete {
        /// File record UUID
        id: Uuid,
    },
    /// Account administration
    Users {
        #[command(subcommand)]
        sub: UserCommands,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// List profiles
    List,
    /// Change a profile's display name or role
    Update {
        /// Profile UUID
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        /// admin or user
        #[arg(long)]
        role: Option<String>,
    },
    /// Remove a profile
    Remove {
        /// Profile UUID
        id: Uuid,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn outcome_json(outcome: &FileOutcome) -> serde_json::Value {
    match outcome {
        FileOutcome::Stored(record) => json!({ "status": "stored", "record": record }),
        FileOutcome::Rejected { file_name, error } => json!({
            "status": "rejected",
            "file_name": file_name,
            "error": error.to_string(),
        }),
        FileOutcome::BlobWriteFailed {
            file_name,
            storage_path,
            error,
        } => json!({
            "status": "blob_write_failed",
            "file_name": file_name,
            "storage_path": storage_path,
            "error": error.to_string(),
        }),
        FileOutcome::MetadataInsertFailed {
            file_name,
            orphan_path,
            error,
        } => json!({
            "status": "metadata_insert_failed",
            "file_name": file_name,
            "orphan_path": orphan_path,
            "error": error.to_string(),
        }),
    }
}

async fn read_upload(path: &Path, content_type: &str) -> anyhow::Result<UploadFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadFile::new(file_name, content_type, data))
}

/// Print a failure to stderr. Domain errors carry a code and a suggested action.
fn report_error(err: &anyhow::Error) {
    let Some(app_err) = err.downcast_ref::<AppError>() else {
        tracing::error!(error = %format!("{:#}", err), "Command failed");
        eprintln!("Error: {:#}", err);
        return;
    };

    let details = app_err.detailed_message();
    match app_err.log_level() {
        LogLevel::Debug => tracing::debug!(code = app_err.error_code(), error = %details, "Command failed"),
        LogLevel::Warn => tracing::warn!(code = app_err.error_code(), error = %details, "Command failed"),
        LogLevel::Error => tracing::error!(code = app_err.error_code(), error = %details, "Command failed"),
    }
    eprintln!(
        "{}",
        json!({
            "error": app_err.error_code(),
            "message": app_err.client_message(),
            "recoverable": app_err.is_recoverable(),
            "suggested_action": app_err.suggested_action(),
        })
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    let ctx = AppContext::connect(config).await?;

    match cli.command {
        Commands::List {
            search,
            category,
            sort,
            desc,
            json,
        } => {
            let sort = match sort {
                Some(field) => SortSpec::new(
                    field.parse::<SortField>()?,
                    if desc {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    },
                ),
                None => SortSpec::default(),
            };
            let query = BrowseQuery {
                text: search,
                category: category.parse::<CategoryFilter>()?,
                sort,
            };

            let records = ctx.files.list_all().await?;
            let visible = view(&records, &query);
            if json {
                print_json(&visible)?;
            } else {
                print!("{}", render_table(&visible));
            }
        }
        Commands::Upload {
            files,
            description,
            tags,
            content_type,
        } => {
            let actor = ctx.actor().await?;
            let mut batch = Vec::with_capacity(files.len());
            for path in &files {
                let mut file = read_upload(path, &content_type).await?.with_tag_input(&tags);
                if let Some(description) = &description {
                    file = file.with_description(description.clone());
                }
                batch.push(file);
            }

            let report = ctx.uploads.upload(&actor, batch).await?;
            let outcomes: Vec<_> = report.outcomes.iter().map(outcome_json).collect();
            print_json(&json!({
                "outcomes": outcomes,
                "orphan_paths": report.orphan_paths(),
                "total_files": report.listing.as_ref().map(|l| l.len()).ok(),
            }))?;
            if !report.is_complete() {
                anyhow::bail!("{} file(s) failed to upload", report.failures().count());
            }
        }
        Commands::Link { id } => {
            let record = ctx.find_record(id).await?;
            let url = ctx.links.access_url(&record.storage_path).await?;
            print_json(&json!({
                "id": record.id,
                "name": record.name,
                "signed_url": url,
                "expires_in": docvault_core::constants::ACCESS_URL_TTL_SECS,
            }))?;
        }
        Commands::Rename { id, name } => {
            let actor = ctx.actor().await?;
            let record = ctx.mutations.rename(&actor, id, &name).await?;
            print_json(&record)?;
        }
        Commands::Describe { id, description } => {
            let actor = ctx.actor().await?;
            let record = ctx
                .mutations
                .redescribe(&actor, id, description.as_deref())
                .await?;
            print_json(&record)?;
        }
        Commands::Delete { id } => {
            let actor = ctx.actor().await?;
            actor.require_admin("delete files")?;
            match ctx.find_record(id).await {
                Ok(record) => ctx.deletes.delete(&actor, &record).await?,
                // Already gone counts as deleted.
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e.into()),
            }
            print_json(&json!({ "success": true, "message": format!("File {} deleted", id) }))?;
        }
        Commands::Users { sub } => {
            let actor = ctx.actor().await?;
            match sub {
                UserCommands::List => {
                    let profiles = ctx.accounts.list_profiles(&actor).await?;
                    print_json(&profiles)?;
                }
                UserCommands::Update { id, name, role } => {
                    let role = role.map(|r| r.parse::<Role>()).transpose()?;
                    let profile = ctx
                        .accounts
                        .update_profile(
                            &actor,
                            id,
                            ProfilePatch {
                                display_name: name,
                                role,
                            },
                        )
                        .await?;
                    print_json(&profile)?;
                }
                UserCommands::Remove { id } => {
                    ctx.accounts.remove_profile(&actor, id).await?;
                    print_json(
                        &json!({ "success": true, "message": format!("Profile {} removed", id) }),
                    )?;
                }
            }
        }
    }

    Ok(())
}
