//! # vela-core: Pure Domain Model for Vela POS
//!
//! This crate is the **heart** of Vela POS. It defines every record kind the
//! document store holds, the business rules that guard mutations, and the
//! error taxonomy shared by the store and sync layers.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vela POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Desktop Shell (out of tree)                  │   │
//! │  │    Inventory UI ──► Cart UI ──► Receipt UI ──► Reports UI      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ async fn calls                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                vela-store (repositories, loan ledger)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vela-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │   error   │  │   print   │  │   │
//! │  │   │ RecordKind│  │ loan rule │  │ Validation│  │ PrintSink │  │   │
//! │  │   │ Inventory │  │stock rule │  │   Error   │  │ PrintJob  │  │   │
//! │  │   │ Sale, ... │  │           │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record kinds, id prefixes, and typed document bodies
//! - [`validation`] - Business rule checks (loan balance, stock levels)
//! - [`error`] - Domain error types
//! - [`print`] - Collaborator interface for the host print capability
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in minor units (i64), never floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod print;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vela_core::RecordKind` instead of
// `use vela_core::types::RecordKind`

pub use error::{ValidationError, ValidationResult};
pub use print::{PaperSize, PrintJob, PrintOutcome, PrintSink};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Placeholder supplier name for inventory added without a supplier.
///
/// The store shows "Nil" in the inventory table rather than an empty cell,
/// and the supplier stock report groups unattributed items under it.
pub const NO_SUPPLIER: &str = "Nil";

/// Upper bound on items accepted by a single bulk inventory import.
///
/// ## Business Reason
/// Bulk import is meant for a delivery sheet, not a full catalogue dump.
/// Keeps one `bulk_put` round-trip at a reasonable size.
pub const MAX_BULK_ITEMS: usize = 500;
