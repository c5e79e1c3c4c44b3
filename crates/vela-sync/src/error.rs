//! # Sync Error Types
//!
//! Error types for the replication controller. The retryable/fatal split
//! drives the loop: retryable errors back off and try again, fatal errors
//! stop replication and emit a `Denied` event.

use thiserror::Error;

/// Replication errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote endpoint unreachable or the request failed in transit.
    ///
    /// ## When This Occurs
    /// - Shop network is down (the normal offline case)
    /// - Remote host restarting
    ///
    /// Always retryable; the loop backs off and pauses.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Remote answered with a non-success status.
    #[error("remote returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    /// Remote rejected our credentials or the database name.
    ///
    /// Fatal: retrying will not help until configuration changes.
    #[error("replication denied: {0}")]
    Denied(String),

    /// Local store failure while applying or reading changes.
    #[error(transparent)]
    Store(#[from] vela_store::StoreError),

    /// Payload from the remote could not be decoded.
    #[error("malformed remote payload: {0}")]
    MalformedPayload(String),

    /// Endpoint URL is not a valid http(s) URL.
    #[error("invalid remote URL: {0}")]
    InvalidUrl(String),

    /// Configuration file unreadable or malformed.
    #[error("invalid sync config: {0}")]
    InvalidConfig(String),

    /// Configuration could not be written.
    #[error("failed to save sync config: {0}")]
    ConfigSaveFailed(String),
}

impl SyncError {
    /// Whether the replication loop should back off and retry.
    ///
    /// ## Retry Policy
    /// ```text
    /// Transport / RemoteStatus 5xx  → retry with backoff (offline is normal)
    /// RemoteStatus 401/403          → fatal, becomes Denied
    /// Denied / InvalidUrl / Config  → fatal, loop stops
    /// Store / MalformedPayload      → fatal, needs operator attention
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Transport(_) => true,
            SyncError::RemoteStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::InvalidConfig(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::InvalidConfig(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SyncError::Transport("connection refused".into()).is_retryable());
        assert!(SyncError::RemoteStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(SyncError::RemoteStatus {
            status: 429,
            body: String::new()
        }
        .is_retryable());
        assert!(!SyncError::RemoteStatus {
            status: 401,
            body: String::new()
        }
        .is_retryable());
        assert!(!SyncError::Denied("bad credentials".into()).is_retryable());
        assert!(!SyncError::InvalidUrl("ftp://x".into()).is_retryable());
    }
}
