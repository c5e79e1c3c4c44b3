//! # Sales Repository
//!
//! Completed sales. A sale is written once and never edited; corrections are
//! new documents.

use tracing::info;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::validation::validate_amount;
use vela_core::{RecordKind, Sale};

/// Typed operations over `SAL-` documents.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    store: Store,
}

impl SaleRepository {
    pub fn new(store: Store) -> Self {
        SaleRepository { store }
    }

    /// Records a completed sale, issuing its id and timestamp.
    ///
    /// Stock adjustment happens in the inventory repository before this is
    /// called; the sale document only records what was sold.
    pub async fn add(&self, sale: Sale) -> StoreResult<Stored<Sale>> {
        validate_amount("amount", sale.amount)?;

        let doc = Document::encode(
            RecordKind::Sale,
            ident::generate_id(RecordKind::Sale),
            ident::timestamp_now(),
            &sale,
        )?;
        let written = self.store.put(&doc).await?;

        info!(id = %written.id, amount = sale.amount, "Sale recorded");
        self.store
            .audit()
            .record(
                "Sales",
                "New Sale",
                format!(
                    "Sold {} item(s) for CAF{}",
                    sale.items.len(),
                    sale.amount
                ),
            )
            .await;

        Stored::from_document(&written)
    }

    /// All sales, ascending by id.
    pub async fn all(&self) -> StoreResult<Vec<Stored<Sale>>> {
        let docs = self.store.scan_kind(RecordKind::Sale).await?;
        docs.iter().map(Stored::from_document).collect()
    }

    /// Reads one sale by id.
    pub async fn get(&self, id: &str) -> StoreResult<Stored<Sale>> {
        let doc = self.store.get(id).await?;
        Stored::from_document(&doc)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pool::StoreConfig;
    use vela_core::{PaymentType, SaleLine};

    fn cash_sale(amount: i64) -> Sale {
        Sale {
            items: vec![SaleLine {
                inventory_id: "INV-202608281200-1000".into(),
                title: "Sugar 1kg".into(),
                quantity: 2,
                price: amount / 2,
            }],
            customer_id: None,
            customer_name: None,
            amount,
            payment_type: PaymentType::Cash,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.sales();

        let stored = repo.add(cash_sale(1700)).await.unwrap();
        assert!(stored.id.starts_with("SAL-"));

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.amount, 1700);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let err = store.sales().add(cash_sale(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_loan_sale_keeps_customer_reference() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let mut sale = cash_sale(2000);
        sale.payment_type = PaymentType::Loan;
        sale.customer_id = Some("CUS-202608261711-5501".into());
        sale.customer_name = Some("Amadou".into());

        let stored = store.sales().add(sale).await.unwrap();
        let read = store.sales().get(&stored.id).await.unwrap();
        assert_eq!(
            read.record.customer_id.as_deref(),
            Some("CUS-202608261711-5501")
        );
        assert_eq!(read.record.payment_type, PaymentType::Loan);
    }
}
