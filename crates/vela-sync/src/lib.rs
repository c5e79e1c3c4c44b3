//! # vela-sync: Replication Controller for Vela POS
//!
//! Background replication between the local document store and a remote
//! CouchDB-style endpoint. Push and pull are checkpointed independently, so
//! a crash mid-cycle re-sends at most one batch.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vela POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop Shell (out of tree)                  │   │
//! │  │            sync indicator ◄── SyncEvent broadcast               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vela-sync (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐               │   │
//! │  │   │ replicator │  │   config   │  │   error    │               │   │
//! │  │   │ push/pull  │  │ sync.toml  │  │ retryable? │               │   │
//! │  │   │ backoff    │  │ env vars   │  │            │               │   │
//! │  │   └─────┬──────┘  └────────────┘  └────────────┘               │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │ change feed / checkpoints / apply_remote                   │
//! │  ┌─────────▼───────────────────────────────────────────────────────┐   │
//! │  │                        vela-store                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,ignore
//! use vela_sync::{Replicator, SyncConfig, SyncEvent};
//!
//! let config = SyncConfig::load_or_default(None);
//! if config.is_enabled() {
//!     let handle = Replicator::new(store.clone(), config)?.spawn();
//!     let mut events = handle.subscribe();
//!     while let Ok(event) = events.recv().await {
//!         if let SyncEvent::Paused { .. } = event {
//!             // show the offline badge
//!         }
//!     }
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod replicator;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::{ReplicationSettings, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use replicator::{
    Backoff, Replicator, ReplicatorHandle, SyncEvent, SyncState, SyncStatus, WireDoc,
};
