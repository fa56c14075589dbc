//! Application-wide constants.

use std::time::Duration;

/// Lifetime of an access link handed out for viewing or downloading a file.
pub const ACCESS_URL_TTL_SECS: u64 = 3600;

/// Name of the bucket holding uploaded documents when none is configured.
pub const DEFAULT_BUCKET: &str = "documents";

/// Access-link lifetime as a [`Duration`].
pub const fn access_url_ttl() -> Duration {
    Duration::from_secs(ACCESS_URL_TTL_SECS)
}
