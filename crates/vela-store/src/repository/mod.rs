//! # Repository Layer
//!
//! Typed record operations per kind, built on the document store client.
//!
//! ## Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Desktop shell / tests                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Repository (this layer) ← validation, id issue, audit entries         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store client ← rev-checked puts, prefix scans                         │
//! │                                                                         │
//! │  Each repository is a thin, cloneable handle over the store; no        │
//! │  state of its own.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod expense;
pub mod inventory;
pub mod loan;
pub mod partner;
pub mod receipt;
pub mod report;
pub mod sale;

use serde::de::DeserializeOwned;

use crate::document::Document;
use crate::error::StoreResult;

/// A typed record together with its envelope fields.
///
/// What repositories hand back: the caller needs the id and rev to issue
/// updates, and the timestamp for display, but the record itself stays free
/// of storage concerns.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub id: String,
    pub rev: i64,
    pub timestamp: String,
    pub record: T,
}

impl<T: DeserializeOwned> Stored<T> {
    /// Decodes a document into its typed record, keeping the envelope.
    pub fn from_document(doc: &Document) -> StoreResult<Self> {
        Ok(Stored {
            id: doc.id.clone(),
            rev: doc.rev,
            timestamp: doc.timestamp.clone(),
            record: doc.decode()?,
        })
    }
}
