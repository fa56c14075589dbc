//! Error types module
//!
//! Every core operation either succeeds or fails with exactly one `AppError` variant.
//! The variants follow the failure taxonomy of the file-record engine: validation
//! (rejected before any network call), conflict, not-found, forbidden and transport
//! (the external service was unreachable or answered with an error).
//!
//! `From<sqlx::Error>` is gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for conditions the caller can act on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the caller.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same action can succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field was empty or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The target path or row already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The id or path is no longer present.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller's role does not allow the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The identity service rejected the credentials.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The external service was unreachable or returned an error.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Transport error: {message}")]
    TransportWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    /// Start-up misconfiguration; never produced by a store operation.
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => AppError::NotFound("Row not found".to_string()),
            SqlxError::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(db_err.message().to_string())
            }
            other => AppError::TransportWithSource {
                message: format!("Database error: {}", other),
                source: anyhow::Error::new(other),
            },
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Transport(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Fill in the required fields and try again"),
            LogLevel::Debug,
        ),
        AppError::Conflict(_) => (
            "CONFLICT",
            false,
            Some("Report this to an administrator"),
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            false,
            Some("Refresh the file list"),
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            "FORBIDDEN",
            false,
            Some("Ask an administrator to perform this action"),
            LogLevel::Warn,
        ),
        AppError::Auth(_) => (
            "AUTH_FAILED",
            false,
            Some("Check email and password"),
            LogLevel::Debug,
        ),
        AppError::Transport(_) | AppError::TransportWithSource { .. } => (
            "TRANSPORT_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Fix the configuration and restart"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error output
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Validation(_) => "Validation",
            AppError::Conflict(_) => "Conflict",
            AppError::NotFound(_) => "NotFound",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Auth(_) => "Auth",
            AppError::Transport(_) | AppError::TransportWithSource { .. } => "Transport",
            AppError::Config(_) => "Config",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Validation(ref msg) => msg.clone(),
            AppError::Conflict(_) => "The file could not be stored".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            AppError::Auth(_) => "Invalid credentials".to_string(),
            AppError::Transport(_) | AppError::TransportWithSource { .. } => {
                "The service is unavailable".to_string()
            }
            AppError::Config(ref msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_transport() {
        let err = AppError::Transport("connection reset".to_string());
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "The service is unavailable");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("File not found".to_string());
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "File not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
        assert!(err.is_not_found());
    }

    #[test]
    fn test_error_metadata_auth_hides_detail() {
        let err = AppError::Auth("Invalid login credentials".to_string());
        assert_eq!(err.error_code(), "AUTH_FAILED");
        assert_eq!(err.client_message(), "Invalid credentials");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::TransportWithSource {
            message: "insert failed".to_string(),
            source: anyhow::anyhow!("socket closed"),
        };
        let details = err.detailed_message();
        assert!(details.contains("insert failed"));
        assert!(details.contains("Caused by: socket closed"));
        assert_eq!(err.error_type(), "Transport");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlx_row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(err.is_not_found());

        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.error_code(), "TRANSPORT_ERROR");
    }
}
