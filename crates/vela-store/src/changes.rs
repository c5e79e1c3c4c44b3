//! # Change Feed & Checkpoints
//!
//! Sequence-ordered change feed over the document keyspace, plus the
//! per-remote checkpoints the replicator persists between runs.
//!
//! ## Feed Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Change Feed                                       │
//! │                                                                         │
//! │  Every write bumps the store-wide seq counter; the feed is simply       │
//! │  "documents with seq > N, ascending". Tombstones ARE included: a        │
//! │  deletion must replicate like any other write.                          │
//! │                                                                         │
//! │      seq  id                       deleted                              │
//! │      ───  ──────────────────────   ───────                              │
//! │       41  CUS-202608261711-5501       0                                 │
//! │       42  INV-202608281312-9023       1    ← tombstone, still emitted   │
//! │       43  SAL-202608281315-7730       0                                 │
//! │                                                                         │
//! │  A document rewritten after checkpoint N reappears with a new seq;      │
//! │  the feed carries latest-state-wins, not history.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::FromRow;
use tracing::debug;

use crate::document::{DocRow, Document};
use crate::error::StoreResult;
use crate::pool::Store;

/// One entry in the change feed: the document plus its sequence number.
#[derive(Debug, Clone)]
pub struct Change {
    pub seq: i64,
    pub doc: Document,
}

/// Persisted replication position for one remote endpoint.
///
/// `push_seq` is our local sequence counter; `pull_seq` is whatever opaque
/// token the remote's changes feed handed back last.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Checkpoint {
    pub remote: String,
    pub push_seq: i64,
    pub pull_seq: String,
    pub updated_at: String,
}

impl Store {
    /// Highest sequence number written so far (0 for an empty store).
    pub async fn latest_seq(&self) -> StoreResult<i64> {
        let seq: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(seq), 0) FROM documents")
            .fetch_one(&self.pool)
            .await?;
        Ok(seq)
    }

    /// Documents written after `since`, ascending by seq, tombstones included.
    pub async fn changes_since(&self, since: i64, limit: u32) -> StoreResult<Vec<Change>> {
        debug!(since, limit, "Reading change feed");

        let rows: Vec<DocRow> = sqlx::query_as(
            "SELECT id, rev, kind, deleted, body, timestamp, seq FROM documents \
             WHERE seq > ?1 ORDER BY seq ASC LIMIT ?2",
        )
        .bind(since)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let seq = row.seq;
                row.into_document().map(|doc| Change { seq, doc })
            })
            .collect()
    }

    /// Loads the checkpoint for a remote, if one was ever saved.
    pub async fn checkpoint(&self, remote: &str) -> StoreResult<Option<Checkpoint>> {
        let row: Option<Checkpoint> = sqlx::query_as(
            "SELECT remote, push_seq, pull_seq, updated_at \
             FROM sync_checkpoints WHERE remote = ?1",
        )
        .bind(remote)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Saves (upserts) the checkpoint for a remote.
    pub async fn save_checkpoint(
        &self,
        remote: &str,
        push_seq: i64,
        pull_seq: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO sync_checkpoints (remote, push_seq, pull_seq, updated_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(remote) DO UPDATE SET \
                 push_seq = excluded.push_seq, \
                 pull_seq = excluded.pull_seq, \
                 updated_at = excluded.updated_at",
        )
        .bind(remote)
        .bind(push_seq)
        .bind(pull_seq)
        .bind(crate::ident::timestamp_now())
        .execute(&self.pool)
        .await?;

        debug!(remote, push_seq, pull_seq, "Checkpoint saved");
        Ok(())
    }

    /// Applies one document pulled from a remote, last-write-wins by rev.
    ///
    /// ## Returns
    /// `true` when the remote version was taken, `false` when the local
    /// version was newer-or-equal and kept.
    pub async fn apply_remote(&self, doc: &Document) -> StoreResult<bool> {
        let body = serde_json::to_string(&doc.body)
            .map_err(|e| crate::error::StoreError::corrupt(&doc.id, e))?;

        let local_rev: Option<i64> = sqlx::query_scalar("SELECT rev FROM documents WHERE id = ?1")
            .bind(&doc.id)
            .fetch_optional(&self.pool)
            .await?;

        match local_rev {
            None => {
                sqlx::query(
                    "INSERT INTO documents (id, rev, kind, deleted, body, timestamp, seq) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, \
                             (SELECT COALESCE(MAX(seq), 0) + 1 FROM documents))",
                )
                .bind(&doc.id)
                .bind(doc.rev)
                .bind(doc.kind.tag())
                .bind(doc.deleted)
                .bind(&body)
                .bind(&doc.timestamp)
                .execute(&self.pool)
                .await?;
                Ok(true)
            }
            Some(local) if local < doc.rev => {
                sqlx::query(
                    "UPDATE documents SET \
                         rev = ?1, kind = ?2, deleted = ?3, body = ?4, timestamp = ?5, \
                         seq = (SELECT COALESCE(MAX(seq), 0) + 1 FROM documents) \
                     WHERE id = ?6",
                )
                .bind(doc.rev)
                .bind(doc.kind.tag())
                .bind(doc.deleted)
                .bind(&body)
                .bind(&doc.timestamp)
                .bind(&doc.id)
                .execute(&self.pool)
                .await?;
                Ok(true)
            }
            Some(_) => {
                debug!(id = %doc.id, remote_rev = doc.rev, "Local revision newer, remote dropped");
                Ok(false)
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
