//! # Document Store Client
//!
//! Put/get/bulk/range-scan over the one flat, prefix-partitioned keyspace.
//!
//! ## Keyspace Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    documents (single SQLite table)                      │
//! │                                                                         │
//! │  id                      rev  kind          deleted  seq                │
//! │  ──────────────────────  ───  ────────────  ───────  ───                │
//! │  CUS-202608261711-5501    2   customer         0      41                │
//! │  CUSL-202608281435-8714   1   customer loan    0      57                │
//! │  INV-202608281312-4821    1   inventory        0      55                │
//! │  INV-202608281312-9023    3   inventory        1      58  ← tombstone   │
//! │  SAL-202608281315-7730    1   sales            0      56                │
//! │  ...                                                                    │
//! │                                                                         │
//! │  Range scan [prefix, prefix + U+FFF0) over the PRIMARY KEY emulates    │
//! │  a secondary index; repositories scan with "INV-", "SAL-", ... so the  │
//! │  SUP range can never swallow SUPL documents.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Contract
//! Every write carries the revision it read; a stale revision fails with
//! [`StoreError::Conflict`] and nothing is written. No transaction spans
//! multiple documents except [`Store::put_pair`], which the loan ledger uses
//! for its balance-decrement + payment-append pair.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::{Sqlite, Transaction};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::pool::Store;
use vela_core::RecordKind;

/// Upper bound character for prefix range scans (`endKey = prefix + sentinel`).
pub const HIGH_SENTINEL: char = '\u{fff0}';

// =============================================================================
// Document Envelope
// =============================================================================

/// A stored document: envelope fields plus the kind-specific JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Prefix-scoped identifier (`INV-202608281412-4821`).
    pub id: String,

    /// Revision counter; 0 means "not yet written". Every successful write
    /// returns the bumped value, which the next write must present.
    pub rev: i64,

    /// Record kind (also derivable from the id prefix).
    pub kind: RecordKind,

    /// Soft-delete tombstone flag.
    pub deleted: bool,

    /// Normalized `YYYY-MM-DD  HH:MM:SS` write timestamp.
    pub timestamp: String,

    /// The typed record as JSON.
    pub body: Value,
}

impl Document {
    /// Creates a fresh, unwritten document (rev 0).
    pub fn new(kind: RecordKind, id: String, timestamp: String, body: Value) -> Self {
        Document {
            id,
            rev: 0,
            kind,
            deleted: false,
            timestamp,
            body,
        }
    }

    /// Serializes a typed record into a fresh document.
    pub fn encode<T: Serialize>(
        kind: RecordKind,
        id: String,
        timestamp: String,
        record: &T,
    ) -> StoreResult<Self> {
        let body =
            serde_json::to_value(record).map_err(|e| StoreError::corrupt(&id, e))?;
        Ok(Document::new(kind, id, timestamp, body))
    }

    /// Deserializes the body into its typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.body.clone())
            .map_err(|e| StoreError::corrupt(&self.id, e))
    }
}

/// Per-document outcome of a [`Store::bulk_put`].
#[derive(Debug)]
pub struct BulkResult {
    pub id: String,
    pub outcome: StoreResult<Document>,
}

impl BulkResult {
    /// True when this document was written.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct DocRow {
    pub id: String,
    pub rev: i64,
    pub kind: String,
    pub deleted: bool,
    pub body: String,
    pub timestamp: String,
    #[allow(dead_code)]
    pub seq: i64,
}

impl DocRow {
    pub(crate) fn into_document(self) -> StoreResult<Document> {
        let kind = RecordKind::from_tag(&self.kind)
            .ok_or_else(|| StoreError::corrupt(&self.id, format!("unknown kind tag '{}'", self.kind)))?;
        let body: Value =
            serde_json::from_str(&self.body).map_err(|e| StoreError::corrupt(&self.id, e))?;
        Ok(Document {
            id: self.id,
            rev: self.rev,
            kind,
            deleted: self.deleted,
            timestamp: self.timestamp,
            body,
        })
    }
}

const SELECT_COLUMNS: &str = "id, rev, kind, deleted, body, timestamp, seq";

// =============================================================================
// Store Client Operations
// =============================================================================

impl Store {
    /// Writes a document.
    ///
    /// ## Revision Rules
    /// - `rev == 0`: insert; fails with `Conflict` if the id already exists
    /// - `rev > 0`: replace; must equal the current revision or the write
    ///   fails with `Conflict` and nothing changes
    ///
    /// ## Returns
    /// The document with its new revision.
    pub async fn put(&self, doc: &Document) -> StoreResult<Document> {
        let mut tx = self.pool.begin().await?;
        let written = put_in_tx(&mut tx, doc).await?;
        tx.commit().await?;
        Ok(written)
    }

    /// Writes two documents atomically (both or neither).
    ///
    /// The loan ledger's balance decrement and payment append go through
    /// here; issued as two independent puts they would leave a crash window
    /// where the balance dropped without a payment record.
    pub async fn put_pair(&self, a: &Document, b: &Document) -> StoreResult<(Document, Document)> {
        let mut tx = self.pool.begin().await?;
        let first = put_in_tx(&mut tx, a).await?;
        let second = put_in_tx(&mut tx, b).await?;
        tx.commit().await?;
        Ok((first, second))
    }

    /// Reads a document by id.
    ///
    /// Tombstoned documents are still returned; scans are what hide them.
    /// `NotFound` only when the id was never written.
    pub async fn get(&self, id: &str) -> StoreResult<Document> {
        let row: Option<DocRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_document(),
            None => Err(StoreError::not_found(id)),
        }
    }

    /// Writes a batch, one outcome per document.
    ///
    /// A conflicting or failing document does not abort the rest; callers
    /// inspect the result list.
    pub async fn bulk_put(&self, docs: &[Document]) -> Vec<BulkResult> {
        let mut results = Vec::with_capacity(docs.len());
        for doc in docs {
            let outcome = self.put(doc).await;
            results.push(BulkResult {
                id: doc.id.clone(),
                outcome,
            });
        }
        results
    }

    /// Ordered ascending scan over `[start, end)`, excluding tombstones.
    pub async fn scan_range(&self, start: &str, end: &str) -> StoreResult<Vec<Document>> {
        debug!(start = %start, end = %end, "Range scan");

        let rows: Vec<DocRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents \
             WHERE id >= ?1 AND id < ?2 AND deleted = 0 \
             ORDER BY id ASC"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocRow::into_document).collect()
    }

    /// Prefix-bounded scan using the high-sentinel convention.
    pub async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<Document>> {
        let end = format!("{prefix}{HIGH_SENTINEL}");
        self.scan_range(prefix, &end).await
    }

    /// All live documents of one kind, scanned by `<PREFIX>-`.
    pub async fn scan_kind(&self, kind: RecordKind) -> StoreResult<Vec<Document>> {
        self.scan_prefix(&format!("{}-", kind.prefix())).await
    }

    /// Full scan, descending by raw key, excluding tombstones.
    ///
    /// Key order is prefix-then-minute, so documents created within the same
    /// minute interleave by their random suffix. Reports accept that.
    pub async fn scan_all_descending(&self) -> StoreResult<Vec<Document>> {
        let rows: Vec<DocRow> = sqlx::query_as(&format!(
            "SELECT {SELECT_COLUMNS} FROM documents WHERE deleted = 0 ORDER BY id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocRow::into_document).collect()
    }
}

/// Shared insert/replace logic, run inside a transaction.
async fn put_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    doc: &Document,
) -> StoreResult<Document> {
    let body = serde_json::to_string(&doc.body).map_err(|e| StoreError::corrupt(&doc.id, e))?;

    if doc.rev == 0 {
        let result = sqlx::query(
            "INSERT INTO documents (id, rev, kind, deleted, body, timestamp, seq) \
             VALUES (?1, 1, ?2, ?3, ?4, ?5, \
                     (SELECT COALESCE(MAX(seq), 0) + 1 FROM documents))",
        )
        .bind(&doc.id)
        .bind(doc.kind.tag())
        .bind(doc.deleted)
        .bind(&body)
        .bind(&doc.timestamp)
        .execute(&mut **tx)
        .await;

        match result {
            Ok(_) => {}
            Err(sqlx::Error::Database(db_err))
                if db_err.message().contains("UNIQUE constraint failed") =>
            {
                // Id already taken: either a same-minute random collision or
                // a stale rev-0 retry.
                return Err(StoreError::conflict(&doc.id, 0));
            }
            Err(other) => return Err(other.into()),
        }

        debug!(id = %doc.id, kind = %doc.kind, "Inserted document");
        let mut written = doc.clone();
        written.rev = 1;
        return Ok(written);
    }

    let result = sqlx::query(
        "UPDATE documents SET \
             rev = rev + 1, \
             kind = ?1, \
             deleted = ?2, \
             body = ?3, \
             timestamp = ?4, \
             seq = (SELECT COALESCE(MAX(seq), 0) + 1 FROM documents) \
         WHERE id = ?5 AND rev = ?6",
    )
    .bind(doc.kind.tag())
    .bind(doc.deleted)
    .bind(&body)
    .bind(&doc.timestamp)
    .bind(&doc.id)
    .bind(doc.rev)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        // Distinguish a stale revision from a missing document.
        let exists: Option<i64> = sqlx::query_scalar("SELECT rev FROM documents WHERE id = ?1")
            .bind(&doc.id)
            .fetch_optional(&mut **tx)
            .await?;

        return Err(match exists {
            Some(_) => StoreError::conflict(&doc.id, doc.rev),
            None => StoreError::not_found(&doc.id),
        });
    }

    debug!(id = %doc.id, rev = doc.rev + 1, "Replaced document");
    let mut written = doc.clone();
    written.rev += 1;
    Ok(written)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StoreConfig;
    use serde_json::json;

    async fn test_store() -> Store {
        Store::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn doc(kind: RecordKind, id: &str, body: Value) -> Document {
        Document::new(kind, id.to_string(), "2026-08-28  12:00:00".to_string(), body)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = test_store().await;
        let d = doc(
            RecordKind::Inventory,
            "INV-202608281200-1234",
            json!({"title": "Sugar 1kg"}),
        );

        let written = store.put(&d).await.unwrap();
        assert_eq!(written.rev, 1);

        let read = store.get("INV-202608281200-1234").await.unwrap();
        assert_eq!(read.body["title"], "Sugar 1kg");
        assert_eq!(read.rev, 1);
        assert_eq!(read.kind, RecordKind::Inventory);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = test_store().await;
        let err = store.get("INV-000000000000-0000").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_stale_rev_conflicts() {
        let store = test_store().await;
        let d = doc(RecordKind::Sale, "SAL-202608281200-1234", json!({"amount": 500}));
        let v1 = store.put(&d).await.unwrap();

        // First replace succeeds, second carries the stale rev
        let mut update = v1.clone();
        update.body = json!({"amount": 600});
        store.put(&update).await.unwrap();

        let err = store.put(&update).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected_rev: 1, .. }));
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = test_store().await;
        let d = doc(RecordKind::Sale, "SAL-202608281200-1234", json!({}));
        store.put(&d).await.unwrap();
        let err = store.put(&d).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { expected_rev: 0, .. }));
    }

    #[tokio::test]
    async fn test_prefix_scan_separates_sup_from_supl() {
        let store = test_store().await;
        store
            .put(&doc(RecordKind::Supplier, "SUP-202608281200-1111", json!({"name": "A"})))
            .await
            .unwrap();
        store
            .put(&doc(
                RecordKind::SupplierLoan,
                "SUPL-202608281200-2222",
                json!({"amount": 10}),
            ))
            .await
            .unwrap();

        let suppliers = store.scan_kind(RecordKind::Supplier).await.unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(suppliers[0].id, "SUP-202608281200-1111");

        let payments = store.scan_kind(RecordKind::SupplierLoan).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, "SUPL-202608281200-2222");
    }

    #[tokio::test]
    async fn test_tombstone_hidden_from_scan_but_readable() {
        let store = test_store().await;
        let d = doc(RecordKind::Inventory, "INV-202608281200-1234", json!({"title": "Salt"}));
        let mut written = store.put(&d).await.unwrap();

        written.deleted = true;
        store.put(&written).await.unwrap();

        let scan = store.scan_kind(RecordKind::Inventory).await.unwrap();
        assert!(scan.is_empty());

        // Still physically present
        let read = store.get("INV-202608281200-1234").await.unwrap();
        assert!(read.deleted);
    }

    #[tokio::test]
    async fn test_bulk_put_reports_per_doc() {
        let store = test_store().await;
        let a = doc(RecordKind::Inventory, "INV-202608281200-0001", json!({}));
        store.put(&a).await.unwrap();

        // a collides, b is fine
        let b = doc(RecordKind::Inventory, "INV-202608281200-0002", json!({}));
        let results = store.bulk_put(&[a, b]).await;

        assert_eq!(results.len(), 2);
        assert!(!results[0].is_ok());
        assert!(results[1].is_ok());
    }

    #[tokio::test]
    async fn test_descending_scan_order() {
        let store = test_store().await;
        for id in ["EXP-202608281200-1000", "SAL-202608281200-1000", "INV-202608281200-1000"] {
            let kind = RecordKind::of_id(id).unwrap();
            store.put(&doc(kind, id, json!({}))).await.unwrap();
        }

        let all = store.scan_all_descending().await.unwrap();
        let ids: Vec<&str> = all.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "SAL-202608281200-1000",
                "INV-202608281200-1000",
                "EXP-202608281200-1000"
            ]
        );
    }
}
