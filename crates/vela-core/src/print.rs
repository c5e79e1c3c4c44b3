//! # Print Boundary
//!
//! The core exposes no print logic of its own: printing is a capability the
//! host window provides. This module defines the collaborator interface the
//! receipt flow calls out to, and the `{success, message}` shape it gets back.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Receipt Print Flow                               │
//! │                                                                         │
//! │  ReceiptRepository::print_and_mark(id, sink, paper)                    │
//! │       │                                                                 │
//! │       ├── build PrintJob from the stored receipt                       │
//! │       │                                                                 │
//! │       ├── sink.print(job, paper)  ← host capability (Electron/Tauri)   │
//! │       │        │                                                        │
//! │       │        └── PrintOutcome { success, message }                   │
//! │       │                                                                 │
//! │       └── success? mark_printed(id)  ← false→true exactly once         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::types::SaleLine;

// =============================================================================
// Paper Size
// =============================================================================

/// The two paper formats the host printer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    /// Regular full-page printout (A4 report style).
    FullPage,
    /// Narrow thermal receipt roll.
    Receipt,
}

// =============================================================================
// Print Job & Outcome
// =============================================================================

/// Everything the host needs to render a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJob {
    pub receipt_id: String,
    #[serde(rename = "SalesID")]
    pub sales_id: String,
    pub order: Vec<SaleLine>,
    pub amount: i64,
    pub timestamp: String,
}

/// Result reported back by the host print capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOutcome {
    pub success: bool,
    pub message: String,
}

impl PrintOutcome {
    /// A successful acknowledgment.
    pub fn ok() -> Self {
        PrintOutcome {
            success: true,
            message: String::new(),
        }
    }

    /// A failure with an operator-visible reason.
    pub fn failed(message: impl Into<String>) -> Self {
        PrintOutcome {
            success: false,
            message: message.into(),
        }
    }
}

// =============================================================================
// Print Sink Trait
// =============================================================================

/// Host-provided print capability (implemented by the desktop shell).
pub trait PrintSink: Send + Sync {
    /// Sends a job to the printer in the requested paper format.
    fn print(&self, job: &PrintJob, paper: PaperSize) -> PrintOutcome;
}

/// No-op sink for testing: acknowledges every job.
pub struct NoOpPrinter;

impl PrintSink for NoOpPrinter {
    fn print(&self, _job: &PrintJob, _paper: PaperSize) -> PrintOutcome {
        PrintOutcome::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_printer_acknowledges() {
        let job = PrintJob {
            receipt_id: "REC-202608281200-1234".into(),
            sales_id: "SAL-202608281200-5678".into(),
            order: vec![],
            amount: 1500,
            timestamp: "2026-08-28  12:00:00".into(),
        };
        let outcome = NoOpPrinter.print(&job, PaperSize::Receipt);
        assert!(outcome.success);
    }
}
