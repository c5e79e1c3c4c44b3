//! # Store Error Types
//!
//! Error types for document store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← categorized per the four failure kinds:    │
//! │       │                      NotFound / Conflict / Validation / Storage │
//! │       ▼                                                                 │
//! │  Caller branches on the kind ← never on truthiness                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each failure is a typed variant so the shell can decide whether to block
//! the user action (validation), refresh and retry (conflict), or surface a
//! storage problem.

use thiserror::Error;
use vela_core::ValidationError;

/// Document store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced document id does not exist.
    ///
    /// ## When This Occurs
    /// - `get` on an id that was never written
    /// - Loan payment against a deleted holder
    #[error("document not found: {id}")]
    NotFound { id: String },

    /// Stale revision on write (optimistic concurrency).
    ///
    /// ## When This Occurs
    /// - Two flows read the same document, both write it back
    /// - The second write carries the old rev and is rejected
    ///
    /// The caller should re-read and re-apply, or surface the conflict.
    #[error("revision conflict on {id}: expected rev {expected_rev}")]
    Conflict { id: String, expected_rev: i64 },

    /// Business-rule check failed before any write was performed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Stored body could not be decoded into its typed record.
    ///
    /// ## When This Occurs
    /// - A document written by an older schema version
    /// - Manual edits on the remote endpoint replicated down
    #[error("document {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    /// Underlying I/O failure from SQLite.
    #[error("storage failure: {0}")]
    Storage(String),

    /// Database file could not be opened or the pool could not be built.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed on open.
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}

impl StoreError {
    /// Creates a NotFound error for the given id.
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound { id: id.into() }
    }

    /// Creates a Conflict error for the given id and stale revision.
    pub fn conflict(id: impl Into<String>, expected_rev: i64) -> Self {
        StoreError::Conflict {
            id: id.into(),
            expected_rev,
        }
    }

    /// Creates a Corrupt error for a body that failed to decode.
    pub fn corrupt(id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        StoreError::Corrupt {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound  → StoreError::NotFound (id filled by caller)
/// sqlx::Error::PoolClosed   → StoreError::ConnectionFailed
/// Other                     → StoreError::Storage
/// ```
/// Unique-constraint violations are mapped to Conflict by the put path,
/// which knows the id involved.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound {
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolClosed => {
                StoreError::ConnectionFailed("pool is closed".to_string())
            }
            sqlx::Error::PoolTimedOut => {
                StoreError::ConnectionFailed("pool timed out".to_string())
            }
            other => StoreError::Storage(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::MigrationFailed(err.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
