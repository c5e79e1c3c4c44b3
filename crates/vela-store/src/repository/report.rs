//! # Reports
//!
//! The one cross-kind read: sales and expenditures merged into a single
//! newest-first list for the daily report screen.
//!
//! Ordering is by raw document key descending. Keys sort by prefix before
//! minute (`SAL-` after `INV-` after `EXP-`), so this is NOT a strict
//! chronological merge; the report screen has always shown it this way and
//! changing it would reshuffle historical printouts.

use crate::error::StoreResult;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::{Expenditure, RecordKind, Sale};

/// One line of the combined report.
#[derive(Debug, Clone)]
pub enum ReportEntry {
    Sale(Stored<Sale>),
    Expenditure(Stored<Expenditure>),
}

impl ReportEntry {
    /// Document id of the underlying record.
    pub fn id(&self) -> &str {
        match self {
            ReportEntry::Sale(s) => &s.id,
            ReportEntry::Expenditure(e) => &e.id,
        }
    }

    /// Amount in minor units (positive for both sides; the variant tells
    /// the caller which way the money moved).
    pub fn amount(&self) -> i64 {
        match self {
            ReportEntry::Sale(s) => s.record.amount,
            ReportEntry::Expenditure(e) => e.record.amount,
        }
    }
}

/// Cross-kind report reader.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    store: Store,
}

impl ReportRepository {
    pub fn new(store: Store) -> Self {
        ReportRepository { store }
    }

    /// Sales and expenditures, descending by raw key.
    pub async fn combined(&self) -> StoreResult<Vec<ReportEntry>> {
        let docs = self.store.scan_all_descending().await?;

        let mut entries = Vec::new();
        for doc in &docs {
            match doc.kind {
                RecordKind::Sale => entries.push(ReportEntry::Sale(Stored::from_document(doc)?)),
                RecordKind::Expenditure => {
                    entries.push(ReportEntry::Expenditure(Stored::from_document(doc)?))
                }
                _ => {}
            }
        }
        Ok(entries)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StoreConfig;
    use vela_core::{NewInventoryItem, PaymentType, SaleLine};

    #[tokio::test]
    async fn test_combined_filters_and_orders() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();

        // Inventory noise the report must skip
        store
            .inventory()
            .add(
                NewInventoryItem {
                    title: "Sugar 1kg".into(),
                    cost_price: 700,
                    min_price: 850,
                    max_price: 1000,
                    total_stock: 24,
                },
                None,
            )
            .await
            .unwrap();

        let sale = store
            .sales()
            .add(Sale {
                items: vec![SaleLine {
                    inventory_id: "INV-202608281200-1000".into(),
                    title: "Sugar 1kg".into(),
                    quantity: 1,
                    price: 850,
                }],
                customer_id: None,
                customer_name: None,
                amount: 850,
                payment_type: PaymentType::Cash,
            })
            .await
            .unwrap();
        let expense = store
            .expenses()
            .add(Expenditure {
                reason: "Fuel".into(),
                name: "Musa".into(),
                amount: 3000,
            })
            .await
            .unwrap();

        let entries = store.reports().combined().await.unwrap();
        assert_eq!(entries.len(), 2);

        // SAL- sorts above EXP- in descending key order
        assert_eq!(entries[0].id(), sale.id);
        assert_eq!(entries[1].id(), expense.id);
        assert!(matches!(entries[0], ReportEntry::Sale(_)));
        assert!(matches!(entries[1], ReportEntry::Expenditure(_)));
        assert_eq!(entries[1].amount(), 3000);
    }
}
