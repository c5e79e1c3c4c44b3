//! # Receipts Repository
//!
//! Printable receipts over completed sales, plus the print boundary glue.
//!
//! ## Print Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  issue(sale)  →  REC- document, printed = false                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  print_and_mark(receipt, sink, paper)                                  │
//! │       │                                                                 │
//! │       ├── sink.print(job) succeeds → printed flips to true (once)      │
//! │       └── sink.print(job) fails   → receipt untouched, outcome to UI   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::print::{PaperSize, PrintJob, PrintOutcome, PrintSink};
use vela_core::{NewReceipt, Receipt, RecordKind};

/// Typed operations over `REC-` documents.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    store: Store,
}

impl ReceiptRepository {
    pub fn new(store: Store) -> Self {
        ReceiptRepository { store }
    }

    /// Issues a receipt for a sale. `printed` always starts false, whatever
    /// the caller sent.
    pub async fn issue(&self, input: NewReceipt) -> StoreResult<Stored<Receipt>> {
        let receipt = Receipt {
            sales_id: input.sales_id,
            order: input.order,
            amount: input.amount,
            printed: false,
        };

        let doc = Document::encode(
            RecordKind::Receipt,
            ident::generate_id(RecordKind::Receipt),
            ident::timestamp_now(),
            &receipt,
        )?;
        let written = self.store.put(&doc).await?;

        info!(id = %written.id, sale = %receipt.sales_id, "Receipt issued");
        self.store
            .audit()
            .record(
                "Receipt",
                "Generated Receipt",
                format!("Generated receipt for sale {}", receipt.sales_id),
            )
            .await;

        Stored::from_document(&written)
    }

    /// All receipts, ascending by id.
    pub async fn all(&self) -> StoreResult<Vec<Stored<Receipt>>> {
        let docs = self.store.scan_kind(RecordKind::Receipt).await?;
        docs.iter().map(Stored::from_document).collect()
    }

    /// Reads one receipt by id.
    pub async fn get(&self, id: &str) -> StoreResult<Stored<Receipt>> {
        let doc = self.store.get(id).await?;
        Stored::from_document(&doc)
    }

    /// Marks a receipt printed. Idempotent: an already printed receipt is
    /// returned unchanged with no write issued.
    pub async fn mark_printed(&self, existing: &Stored<Receipt>) -> StoreResult<Stored<Receipt>> {
        if existing.record.printed {
            return Ok(existing.clone());
        }

        let mut receipt = existing.record.clone();
        receipt.printed = true;

        let mut doc = Document::encode(
            RecordKind::Receipt,
            existing.id.clone(),
            ident::timestamp_now(),
            &receipt,
        )?;
        doc.rev = existing.rev;
        let written = self.store.put(&doc).await?;

        info!(id = %existing.id, "Receipt marked printed");
        self.store
            .audit()
            .record(
                "Receipt",
                "Printed Receipt",
                format!("Printed receipt: {}", existing.id),
            )
            .await;

        Stored::from_document(&written)
    }

    /// Hands the receipt to the print sink and, on acknowledged success,
    /// marks it printed.
    ///
    /// A failed print leaves the receipt untouched; the outcome carries the
    /// sink's message either way.
    pub async fn print_and_mark(
        &self,
        existing: &Stored<Receipt>,
        sink: &dyn PrintSink,
        paper: PaperSize,
    ) -> StoreResult<(Stored<Receipt>, PrintOutcome)> {
        let job = PrintJob {
            receipt_id: existing.id.clone(),
            sales_id: existing.record.sales_id.clone(),
            order: existing.record.order.clone(),
            amount: existing.record.amount,
            timestamp: existing.timestamp.clone(),
        };

        let outcome = sink.print(&job, paper);
        if outcome.success {
            let marked = self.mark_printed(existing).await?;
            Ok((marked, outcome))
        } else {
            Ok((existing.clone(), outcome))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StoreConfig;
    use vela_core::print::NoOpPrinter;
    use vela_core::SaleLine;

    fn receipt_input() -> NewReceipt {
        NewReceipt {
            sales_id: "SAL-202608281315-7730".into(),
            order: vec![SaleLine {
                inventory_id: "INV-202608281200-1000".into(),
                title: "Sugar 1kg".into(),
                quantity: 1,
                price: 850,
            }],
            amount: 850,
        }
    }

    struct FailingPrinter;
    impl PrintSink for FailingPrinter {
        fn print(&self, _job: &PrintJob, _paper: PaperSize) -> PrintOutcome {
            PrintOutcome::failed("printer offline")
        }
    }

    #[tokio::test]
    async fn test_issue_forces_unprinted() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let stored = store.receipts().issue(receipt_input()).await.unwrap();
        assert!(stored.id.starts_with("REC-"));
        assert!(!stored.record.printed);
    }

    #[tokio::test]
    async fn test_mark_printed_is_idempotent() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.receipts();
        let stored = repo.issue(receipt_input()).await.unwrap();

        let once = repo.mark_printed(&stored).await.unwrap();
        assert!(once.record.printed);

        // Second mark: no write, same rev
        let twice = repo.mark_printed(&once).await.unwrap();
        assert_eq!(twice.rev, once.rev);
    }

    #[tokio::test]
    async fn test_issue_and_print_append_audit_entries() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.receipts();
        let stored = repo.issue(receipt_input()).await.unwrap();
        let marked = repo.mark_printed(&stored).await.unwrap();

        let entries = store.audit().entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .any(|e| e.record.activity == "Generated Receipt"
                && e.record.message.contains(&stored.record.sales_id)));
        assert!(entries
            .iter()
            .any(|e| e.record.activity == "Printed Receipt"
                && e.record.message.contains(&stored.id)));

        // Re-marking is a no-op and must not log again
        repo.mark_printed(&marked).await.unwrap();
        assert_eq!(store.audit().entries().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_print_leaves_receipt_unprinted() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.receipts();
        let stored = repo.issue(receipt_input()).await.unwrap();

        let (after, outcome) = repo
            .print_and_mark(&stored, &FailingPrinter, PaperSize::Receipt)
            .await
            .unwrap();
        assert!(!outcome.success);
        assert!(!after.record.printed);
        assert_eq!(after.rev, stored.rev);
    }

    #[tokio::test]
    async fn test_successful_print_marks() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.receipts();
        let stored = repo.issue(receipt_input()).await.unwrap();

        let (after, outcome) = repo
            .print_and_mark(&stored, &NoOpPrinter, PaperSize::FullPage)
            .await
            .unwrap();
        assert!(outcome.success);
        assert!(after.record.printed);
    }
}
