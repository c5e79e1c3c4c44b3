//! # vela-store: Document Store for Vela POS
//!
//! SQLite-backed document store: one flat, prefix-partitioned keyspace with
//! rev-checked writes, a change feed for replication, and typed repositories
//! per record kind.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vela POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop Shell (out of tree)                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vela-store (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐               │   │
//! │  │   │ repository │  │  document  │  │  changes   │               │   │
//! │  │   │ inventory  │  │ put / get  │  │ seq feed   │               │   │
//! │  │   │ sales, ... │  │ scans      │  │ checkpoints│               │   │
//! │  │   │ loan ledger│  │ put_pair   │  │ LWW apply  │               │   │
//! │  │   └─────┬──────┘  └─────┬──────┘  └─────┬──────┘               │   │
//! │  │         └───────────────┼───────────────┘                      │   │
//! │  │   ┌────────────┐  ┌─────▼──────┐  ┌────────────┐               │   │
//! │  │   │   ident    │  │    pool    │  │   audit    │               │   │
//! │  │   │ id issue   │  │ Store +    │  │ LOG- trail │               │   │
//! │  │   │ timestamps │  │ migrations │  │            │               │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 vela-core (types, validation)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,ignore
//! use vela_store::{Store, StoreConfig};
//!
//! let store = Store::open(StoreConfig::new("/var/lib/vela/vela.db")).await?;
//! let items = store.inventory().all().await?;
//! store.close().await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod changes;
pub mod document;
pub mod error;
pub mod ident;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use audit::AuditLog;
pub use changes::{Change, Checkpoint};
pub use document::{BulkResult, Document, HIGH_SENTINEL};
pub use error::{StoreError, StoreResult};
pub use pool::{Store, StoreConfig};
pub use repository::loan::{LoanLedger, LoanPaymentOutcome};
pub use repository::report::ReportEntry;
pub use repository::Stored;
