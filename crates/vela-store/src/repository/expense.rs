//! # Expenditures Repository
//!
//! Money taken out of the till for non-sale reasons. Append-only like sales.

use tracing::info;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::validation::validate_amount;
use vela_core::{Expenditure, RecordKind};

/// Typed operations over `EXP-` documents.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    store: Store,
}

impl ExpenseRepository {
    pub fn new(store: Store) -> Self {
        ExpenseRepository { store }
    }

    /// Records an expenditure.
    pub async fn add(&self, expense: Expenditure) -> StoreResult<Stored<Expenditure>> {
        validate_amount("amount", expense.amount)?;

        let doc = Document::encode(
            RecordKind::Expenditure,
            ident::generate_id(RecordKind::Expenditure),
            ident::timestamp_now(),
            &expense,
        )?;
        let written = self.store.put(&doc).await?;

        info!(id = %written.id, amount = expense.amount, "Expenditure recorded");
        self.store
            .audit()
            .record(
                "Expenditure",
                "New Expenditure",
                format!(
                    "{} took CAF{} for {}",
                    expense.name, expense.amount, expense.reason
                ),
            )
            .await;

        Stored::from_document(&written)
    }

    /// All expenditures, ascending by id.
    pub async fn all(&self) -> StoreResult<Vec<Stored<Expenditure>>> {
        let docs = self.store.scan_kind(RecordKind::Expenditure).await?;
        docs.iter().map(Stored::from_document).collect()
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

    #[tokio::test]
    async fn test_add_and_list() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.expenses();

        let stored = repo
            .add(Expenditure {
                reason: "Generator fuel".into(),
                name: "Musa".into(),
                amount: 3000,
            })
            .await
            .unwrap();
        assert!(stored.id.starts_with("EXP-"));

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.reason, "Generator fuel");
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let err = store
            .expenses()
            .add(Expenditure {
                reason: "nothing".into(),
                name: "Musa".into(),
                amount: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
