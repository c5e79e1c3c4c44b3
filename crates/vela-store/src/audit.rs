//! # Activity Logger
//!
//! Append-only audit trail of user-visible actions, stored as `LOG-`
//! documents in the same keyspace so it replicates with everything else.
//!
//! Logging is best-effort: a failed audit write is reported through
//! `tracing` and swallowed, it never fails the operation being logged.

use tracing::warn;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::{LogRecord, RecordKind};

/// Writer/reader for the activity trail.
#[derive(Debug, Clone)]
pub struct AuditLog {
    store: Store,
}

impl AuditLog {
    pub fn new(store: Store) -> Self {
        AuditLog { store }
    }

    /// Appends one activity entry. Never fails the caller.
    pub async fn record(&self, category: &str, activity: &str, message: String) {
        let entry = LogRecord {
            category: category.to_string(),
            activity: activity.to_string(),
            message,
        };

        if let Err(e) = self.append(&entry).await {
            warn!(category, activity, error = %e, "Audit write failed, entry dropped");
        }
    }

    async fn append(&self, entry: &LogRecord) -> StoreResult<()> {
        let doc = Document::encode(
            RecordKind::Log,
            ident::generate_id(RecordKind::Log),
            ident::timestamp_now(),
            entry,
        )?;
        self.store.put(&doc).await?;
        Ok(())
    }

    /// All activity entries, ascending by id (chronological to the minute).
    pub async fn entries(&self) -> StoreResult<Vec<Stored<LogRecord>>> {
        let docs = self.store.scan_kind(RecordKind::Log).await?;
        docs.iter().map(Stored::from_document).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StoreConfig;

    #[tokio::test]
    async fn test_record_and_read_back() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let audit = store.audit();

        audit
            .record("inventory", "create", "Added item Sugar 1kg".to_string())
            .await;
        audit
            .record("sales", "create", "Sold 3 items for CAF1500".to_string())
            .await;

        let entries = audit.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().any(|e| e.record.category == "inventory"));
        assert!(entries.iter().any(|e| e.record.message.contains("CAF1500")));
    }

    #[tokio::test]
    async fn test_record_survives_closed_store() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let audit = store.audit();
        store.close().await;

        // Must not panic or error out
        audit.record("logs", "noop", "after close".to_string()).await;
    }
}
