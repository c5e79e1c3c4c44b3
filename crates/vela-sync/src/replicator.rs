//! # Replicator
//!
//! Background push/pull loop between the local document store and the remote
//! endpoint, with lifecycle events for the shell's sync indicator.
//!
//! ## Loop Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Replicator Loop                                  │
//! │                                                                         │
//! │  every poll_interval (or after backoff):                               │
//! │                                                                         │
//! │  PUSH: local changes since push_seq ──► POST {remote}/_bulk_docs       │
//! │           │ success: checkpoint push_seq                                │
//! │                                                                         │
//! │  PULL: GET {remote}/_changes?since=pull_seq ──► apply_remote (LWW)     │
//! │           │ success: checkpoint pull_seq                                │
//! │                                                                         │
//! │  EVENTS (tokio broadcast):                                             │
//! │  ─────────────────────────                                             │
//! │  Active          - a cycle is moving documents                         │
//! │  Change{p,p}     - cycle finished, counts of pushed/pulled docs        │
//! │  Paused{error}   - offline or retryable failure, backing off           │
//! │  Denied{reason}  - remote rejected us, loop stops                      │
//! │  Error{message}  - non-retryable local failure, loop stops             │
//! │  Complete        - clean shutdown                                      │
//! │                                                                         │
//! │  Offline is the NORMAL state for a shop with flaky connectivity:       │
//! │  Paused is routine, not an alarm.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Echo Note
//! A document applied from the remote gets a fresh local seq and is pushed
//! back on the next cycle. The remote sees its own revision again and drops
//! it; wasteful but harmless, and it keeps the feed logic free of
//! provenance tracking.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

use vela_core::RecordKind;
use vela_store::{Document, Store, StoreError};

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

// =============================================================================
// Lifecycle Events
// =============================================================================

/// Events broadcast to the shell's sync indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A cycle is actively moving documents.
    Active,

    /// A cycle completed; counts of documents moved each way.
    Change { pushed: u32, pulled: u32 },

    /// Retryable failure; the loop is backing off. Offline lands here.
    Paused { error: Option<String> },

    /// Remote rejected credentials or database; the loop has stopped.
    Denied { reason: String },

    /// Non-retryable failure; the loop has stopped.
    Error { message: String },

    /// Clean shutdown.
    Complete,
}

/// Coarse replicator state for external queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No cycle moving documents right now.
    #[default]
    Idle,
    /// A cycle is in flight.
    Active,
    /// Backing off after a retryable failure.
    Paused,
    /// Stopped: remote rejected us.
    Denied,
    /// Stopped: non-retryable failure.
    Failed,
    /// Stopped cleanly.
    Stopped,
}

/// Snapshot of the replicator for the shell's status line.
#[derive(Debug, Clone, Default)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_error: Option<String>,
    pub total_pushed: u64,
    pub total_pulled: u64,
}

// =============================================================================
// Wire Format
// =============================================================================

/// Document shape on the wire, both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub rev: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub deleted: bool,
    pub timestamp: String,
    pub body: Value,
}

impl WireDoc {
    /// Builds the wire shape from a stored document.
    pub fn from_document(doc: &Document) -> Self {
        WireDoc {
            id: doc.id.clone(),
            rev: doc.rev,
            kind: doc.kind.tag().to_string(),
            deleted: doc.deleted,
            timestamp: doc.timestamp.clone(),
            body: doc.body.clone(),
        }
    }

    /// Decodes back into a store document.
    pub fn into_document(self) -> SyncResult<Document> {
        let kind = RecordKind::from_tag(&self.kind).ok_or_else(|| {
            SyncError::MalformedPayload(format!("unknown kind tag '{}' on {}", self.kind, self.id))
        })?;
        Ok(Document {
            id: self.id,
            rev: self.rev,
            kind,
            deleted: self.deleted,
            timestamp: self.timestamp,
            body: self.body,
        })
    }
}

#[derive(Debug, Serialize)]
struct BulkDocsRequest {
    docs: Vec<WireDoc>,
}

#[derive(Debug, Deserialize)]
struct ChangesResponse {
    last_seq: String,
    #[serde(default)]
    results: Vec<ChangeRow>,
}

#[derive(Debug, Deserialize)]
struct ChangeRow {
    doc: WireDoc,
}

// =============================================================================
// Backoff
// =============================================================================

/// Exponential backoff state: doubles per failure up to the ceiling, resets
/// on the first successful cycle.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Backoff {
            initial,
            max,
            current: initial,
        }
    }

    /// The delay to sleep now; doubles the next one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = (self.current * 2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

// =============================================================================
// Replicator
// =============================================================================

/// Handle to a running replicator.
pub struct ReplicatorHandle {
    events: broadcast::Sender<SyncEvent>,
    shutdown_tx: mpsc::Sender<()>,
    status: std::sync::Arc<tokio::sync::RwLock<SyncStatus>>,
    task: tokio::task::JoinHandle<()>,
}

impl ReplicatorHandle {
    /// Subscribes to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Snapshot of the current replicator status.
    pub async fn status(&self) -> SyncStatus {
        self.status.read().await.clone()
    }

    /// Requests a clean shutdown and waits for the loop to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            warn!("Replicator task join failed: {}", e);
        }
    }
}

/// The push/pull replication controller.
#[derive(Debug)]
pub struct Replicator {
    store: Store,
    config: SyncConfig,
    remote: String,
    client: reqwest::Client,
}

impl Replicator {
    /// Builds a replicator. Fails when no remote is configured or the
    /// config doesn't validate.
    pub fn new(store: Store, config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let remote = config
            .remote_url()
            .ok_or_else(|| SyncError::InvalidConfig("no remote URL configured".into()))?
            .trim_end_matches('/')
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.replication.request_timeout_secs))
            .build()?;

        Ok(Replicator {
            store,
            config,
            remote,
            client,
        })
    }

    /// Spawns the background loop and returns its handle.
    pub fn spawn(self) -> ReplicatorHandle {
        let (events, _) = broadcast::channel(64);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let status = std::sync::Arc::new(tokio::sync::RwLock::new(SyncStatus::default()));

        let events_clone = events.clone();
        let status_clone = status.clone();
        let task = tokio::spawn(self.run(events_clone, status_clone, shutdown_rx));

        ReplicatorHandle {
            events,
            shutdown_tx,
            status,
            task,
        }
    }

    async fn run(
        self,
        events: broadcast::Sender<SyncEvent>,
        status: std::sync::Arc<tokio::sync::RwLock<SyncStatus>>,
        mut shutdown: mpsc::Receiver<()>,
    ) {
        info!(remote = %self.remote, "Replicator started");

        let mut backoff = Backoff::new(
            Duration::from_millis(self.config.replication.initial_backoff_ms),
            Duration::from_secs(self.config.replication.max_backoff_secs),
        );
        let poll = Duration::from_secs(self.config.replication.poll_interval_secs);
        let mut delay = Duration::ZERO;

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Replicator shutting down");
                    status.write().await.state = SyncState::Stopped;
                    let _ = events.send(SyncEvent::Complete);
                    return;
                }
                _ = tokio::time::sleep(delay) => {}
            }

            match self.cycle(&events).await {
                Ok((pushed, pulled)) => {
                    backoff.reset();
                    delay = poll;
                    if pushed + pulled > 0 {
                        debug!(pushed, pulled, "Replication cycle moved documents");
                    }
                    {
                        let mut s = status.write().await;
                        s.state = SyncState::Idle;
                        s.last_error = None;
                        s.total_pushed += pushed as u64;
                        s.total_pulled += pulled as u64;
                    }
                    let _ = events.send(SyncEvent::Change { pushed, pulled });
                }
                Err(e) if e.is_retryable() => {
                    delay = backoff.next_delay();
                    debug!(error = %e, backoff_ms = delay.as_millis() as u64, "Replication paused");
                    {
                        let mut s = status.write().await;
                        s.state = SyncState::Paused;
                        s.last_error = Some(e.to_string());
                    }
                    let _ = events.send(SyncEvent::Paused {
                        error: Some(e.to_string()),
                    });
                }
                Err(SyncError::Denied(reason)) => {
                    error!(reason = %reason, "Replication denied, stopping");
                    {
                        let mut s = status.write().await;
                        s.state = SyncState::Denied;
                        s.last_error = Some(reason.clone());
                    }
                    let _ = events.send(SyncEvent::Denied { reason });
                    return;
                }
                Err(e) => {
                    error!(error = %e, "Replication failed, stopping");
                    {
                        let mut s = status.write().await;
                        s.state = SyncState::Failed;
                        s.last_error = Some(e.to_string());
                    }
                    let _ = events.send(SyncEvent::Error {
                        message: e.to_string(),
                    });
                    return;
                }
            }
        }
    }

    /// One push + pull cycle. Returns documents moved each way.
    async fn cycle(&self, events: &broadcast::Sender<SyncEvent>) -> SyncResult<(u32, u32)> {
        let checkpoint = self.store.checkpoint(&self.remote).await?;
        let (push_seq, pull_seq) = match &checkpoint {
            Some(cp) => (cp.push_seq, cp.pull_seq.clone()),
            None => (0, "0".to_string()),
        };

        let pending = self
            .store
            .changes_since(push_seq, self.config.replication.batch_size)
            .await?;

        if !pending.is_empty() {
            let _ = events.send(SyncEvent::Active);
        }

        let pushed = self.push(&pending).await?;
        let new_push_seq = pending.last().map(|c| c.seq).unwrap_or(push_seq);

        let (pulled, new_pull_seq) = self.pull(&pull_seq, events).await?;

        if new_push_seq != push_seq || new_pull_seq != pull_seq {
            self.store
                .save_checkpoint(&self.remote, new_push_seq, &new_pull_seq)
                .await?;
        }

        Ok((pushed, pulled))
    }

    async fn push(&self, pending: &[vela_store::Change]) -> SyncResult<u32> {
        if pending.is_empty() {
            return Ok(0);
        }

        let docs: Vec<WireDoc> = pending
            .iter()
            .map(|c| WireDoc::from_document(&c.doc))
            .collect();
        let count = docs.len() as u32;

        let response = self
            .client
            .post(format!("{}/_bulk_docs", self.remote))
            .json(&BulkDocsRequest { docs })
            .send()
            .await?;
        self.check_status(response).await?;

        debug!(count, "Pushed documents");
        Ok(count)
    }

    async fn pull(
        &self,
        since: &str,
        events: &broadcast::Sender<SyncEvent>,
    ) -> SyncResult<(u32, String)> {
        let response = self
            .client
            .get(format!("{}/_changes", self.remote))
            .query(&[
                ("include_docs", "true"),
                ("since", since),
                ("limit", &self.config.replication.batch_size.to_string()),
            ])
            .send()
            .await?;
        let response = self.check_status(response).await?;

        let changes: ChangesResponse = response
            .json()
            .await
            .map_err(|e| SyncError::MalformedPayload(e.to_string()))?;

        if !changes.results.is_empty() {
            let _ = events.send(SyncEvent::Active);
        }

        let mut pulled = 0;
        for row in changes.results {
            let doc = row.doc.into_document()?;
            match self.store.apply_remote(&doc).await {
                Ok(true) => pulled += 1,
                Ok(false) => {
                    debug!(id = %doc.id, "Remote revision older, kept local");
                }
                Err(StoreError::Corrupt { id, reason }) => {
                    // One bad remote document must not wedge the feed
                    warn!(id = %id, reason = %reason, "Skipping corrupt remote document");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok((pulled, changes.last_seq))
    }

    /// Maps HTTP status to the retryable/denied/fatal split.
    async fn check_status(&self, response: reqwest::Response) -> SyncResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SyncError::Denied(format!("{status}: {body}")));
        }
        Err(SyncError::RemoteStatus {
            status: status.as_u16(),
            body,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_doc_roundtrip() {
        let doc = Document {
            id: "INV-202608281200-1234".into(),
            rev: 3,
            kind: RecordKind::Inventory,
            deleted: false,
            timestamp: "2026-08-28  12:00:00".into(),
            body: json!({"title": "Sugar 1kg", "totalStock": 24}),
        };

        let wire = WireDoc::from_document(&doc);
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["_id"], "INV-202608281200-1234");
        assert_eq!(json["type"], "inventory");

        let back: WireDoc = serde_json::from_value(json).unwrap();
        assert_eq!(back.into_document().unwrap(), doc);
    }

    #[test]
    fn test_wire_doc_unknown_kind_rejected() {
        let wire = WireDoc {
            id: "XYZ-202608281200-1234".into(),
            rev: 1,
            kind: "mystery".into(),
            deleted: false,
            timestamp: "2026-08-28  12:00:00".into(),
            body: json!({}),
        };
        assert!(matches!(
            wire.into_document(),
            Err(SyncError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_backoff_doubles_to_ceiling() {
        let mut backoff = Backoff::new(Duration::from_millis(500), Duration::from_secs(4));
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));

        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_changes_response_parses() {
        let raw = json!({
            "last_seq": "87-xyz",
            "results": [
                {"doc": {
                    "_id": "CUS-202608261711-5501",
                    "rev": 2,
                    "type": "customer",
                    "timestamp": "2026-08-26  17:11:09",
                    "body": {"name": "Amadou", "loan": 0}
                }}
            ]
        });
        let parsed: ChangesResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.last_seq, "87-xyz");
        assert_eq!(parsed.results.len(), 1);
        assert!(!parsed.results[0].doc.deleted);
    }

    #[tokio::test]
    async fn test_replicator_requires_remote() {
        let store = Store::open(vela_store::StoreConfig::in_memory())
            .await
            .unwrap();
        let err = Replicator::new(store, SyncConfig::default()).unwrap_err();
        assert!(matches!(err, SyncError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unreachable_remote_emits_paused() {
        let store = Store::open(vela_store::StoreConfig::in_memory())
            .await
            .unwrap();
        // Port 1 refuses immediately: every cycle fails as a retryable
        // transport error and the loop backs off
        let config = SyncConfig::with_remote("http://127.0.0.1:1/vela");
        let handle = Replicator::new(store, config).unwrap().spawn();
        let mut events = handle.subscribe();

        let paused_error = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match events.recv().await {
                    Ok(SyncEvent::Paused { error }) => break error,
                    Ok(_) => {}
                    Err(e) => panic!("event channel closed: {e}"),
                }
            }
        })
        .await
        .expect("no Paused event within timeout");
        assert!(paused_error.is_some());

        let status = handle.status().await;
        assert_eq!(status.state, SyncState::Paused);
        assert!(status.last_error.is_some());

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_emits_complete() {
        let store = Store::open(vela_store::StoreConfig::in_memory())
            .await
            .unwrap();
        // Unroutable remote: the loop will only ever pause, never hard-fail
        let config = SyncConfig::with_remote("http://127.0.0.1:1/vela");
        let handle = Replicator::new(store, config).unwrap().spawn();
        let mut events = handle.subscribe();

        handle.shutdown().await;

        // Drain until Complete shows up
        let mut saw_complete = false;
        while let Ok(event) = events.try_recv() {
            if event == SyncEvent::Complete {
                saw_complete = true;
            }
        }
        assert!(saw_complete);
    }
}
