//! # Inventory Repository
//!
//! Stocked items: create, bulk import, update, soft delete, and the stock
//! adjustment used by the sales flow.

use tracing::info;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::validation::{check_stock_adjust, validate_bulk_inventory, validate_new_inventory};
use vela_core::{InventoryItem, NewInventoryItem, RecordKind};

/// Typed operations over `INV-` documents.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    store: Store,
}

impl InventoryRepository {
    pub fn new(store: Store) -> Self {
        InventoryRepository { store }
    }

    /// Adds a new item.
    ///
    /// Supplier defaults to `"Nil"` when none is given; the audit trail gets
    /// an entry on success.
    pub async fn add(
        &self,
        input: NewInventoryItem,
        supplier: Option<String>,
    ) -> StoreResult<Stored<InventoryItem>> {
        validate_new_inventory(&input)?;
        let item = input.into_item(supplier);

        let doc = Document::encode(
            RecordKind::Inventory,
            ident::generate_id(RecordKind::Inventory),
            ident::timestamp_now(),
            &item,
        )?;
        let written = self.store.put(&doc).await?;

        info!(id = %written.id, title = %item.title, "Inventory item added");
        self.store
            .audit()
            .record(
                "Inventory",
                "Added Item",
                format!("Added new item: {}", item.title),
            )
            .await;

        Stored::from_document(&written)
    }

    /// Bulk import. Validated as a whole up front; after that, each item
    /// succeeds or fails on its own.
    pub async fn add_bulk(
        &self,
        inputs: Vec<NewInventoryItem>,
        supplier: Option<String>,
    ) -> StoreResult<Vec<StoreResult<Stored<InventoryItem>>>> {
        validate_bulk_inventory(&inputs)?;

        let mut docs = Vec::with_capacity(inputs.len());
        for input in inputs {
            let item = input.into_item(supplier.clone());
            docs.push(Document::encode(
                RecordKind::Inventory,
                ident::generate_id(RecordKind::Inventory),
                ident::timestamp_now(),
                &item,
            )?);
        }

        let results = self.store.bulk_put(&docs).await;
        let accepted = results.iter().filter(|r| r.is_ok()).count();

        info!(total = results.len(), accepted, "Bulk inventory import");
        self.store
            .audit()
            .record(
                "Inventory",
                "Bulk Import",
                format!("Imported {accepted} of {} items", results.len()),
            )
            .await;

        Ok(results
            .into_iter()
            .map(|r| r.outcome.and_then(|doc| Stored::from_document(&doc)))
            .collect())
    }

    /// All live items, ascending by id.
    pub async fn all(&self) -> StoreResult<Vec<Stored<InventoryItem>>> {
        let docs = self.store.scan_kind(RecordKind::Inventory).await?;
        docs.iter().map(Stored::from_document).collect()
    }

    /// Reads one item by id.
    pub async fn get(&self, id: &str) -> StoreResult<Stored<InventoryItem>> {
        let doc = self.store.get(id).await?;
        Stored::from_document(&doc)
    }

    /// Replaces an item's record, rev-checked.
    pub async fn update(
        &self,
        existing: &Stored<InventoryItem>,
        item: InventoryItem,
    ) -> StoreResult<Stored<InventoryItem>> {
        let mut doc = Document::encode(
            RecordKind::Inventory,
            existing.id.clone(),
            ident::timestamp_now(),
            &item,
        )?;
        doc.rev = existing.rev;
        let written = self.store.put(&doc).await?;

        self.store
            .audit()
            .record(
                "Inventory",
                "Updated Item",
                format!("Updated item: {}", item.title),
            )
            .await;

        Stored::from_document(&written)
    }

    /// Soft-deletes an item. The tombstone stays behind for replication.
    pub async fn delete(&self, existing: &Stored<InventoryItem>) -> StoreResult<()> {
        let mut doc = Document::encode(
            RecordKind::Inventory,
            existing.id.clone(),
            ident::timestamp_now(),
            &existing.record,
        )?;
        doc.rev = existing.rev;
        doc.deleted = true;
        self.store.put(&doc).await?;

        info!(id = %existing.id, "Inventory item deleted");
        self.store
            .audit()
            .record(
                "Inventory",
                "Deleted Item",
                format!("Deleted item: {}", existing.record.title),
            )
            .await;

        Ok(())
    }

    /// Adjusts stock by a signed delta (negative = sold, positive = restock).
    ///
    /// Rejected before any write when the result would go below zero. On a
    /// concurrent rev conflict the caller should re-read and retry.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<Stored<InventoryItem>> {
        let existing = self.get(id).await?;
        let new_stock = check_stock_adjust(&existing.record.title, existing.record.total_stock, delta)?;

        let mut item = existing.record.clone();
        item.total_stock = new_stock;
        self.update(&existing, item).await
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
    use vela_core::{ValidationError, NO_SUPPLIER};

    async fn repo() -> InventoryRepository {
        Store::open(StoreConfig::in_memory()).await.unwrap().inventory()
    }

    fn sugar() -> NewInventoryItem {
        NewInventoryItem {
            title: "Sugar 1kg".into(),
            cost_price: 700,
            min_price: 850,
            max_price: 1000,
            total_stock: 24,
        }
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let repo = repo().await;
        let stored = repo.add(sugar(), None).await.unwrap();
        assert!(stored.id.starts_with("INV-"));
        assert_eq!(stored.record.supplier, NO_SUPPLIER);

        let all = repo.all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record.title, "Sugar 1kg");
    }

    #[tokio::test]
    async fn test_add_rejects_empty_title() {
        let repo = repo().await;
        let mut bad = sugar();
        bad.title = "".into();
        let err = repo.add(bad, None).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::Required { .. })
        ));
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_bumps_rev() {
        let repo = repo().await;
        let stored = repo.add(sugar(), None).await.unwrap();

        let mut item = stored.record.clone();
        item.max_price = 1100;
        let updated = repo.update(&stored, item).await.unwrap();
        assert_eq!(updated.rev, stored.rev + 1);
        assert_eq!(updated.record.max_price, 1100);
    }

    #[tokio::test]
    async fn test_delete_hides_from_list() {
        let repo = repo().await;
        let stored = repo.add(sugar(), None).await.unwrap();
        repo.delete(&stored).await.unwrap();
        assert!(repo.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_adjust_stock_blocks_oversell() {
        let repo = repo().await;
        let stored = repo.add(sugar(), None).await.unwrap();

        let after = repo.adjust_stock(&stored.id, -4).await.unwrap();
        assert_eq!(after.record.total_stock, 20);

        let err = repo.adjust_stock(&stored.id, -21).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::StockBelowZero { .. })
        ));
        assert_eq!(repo.get(&stored.id).await.unwrap().record.total_stock, 20);
    }

    #[tokio::test]
    async fn test_bulk_import() {
        let repo = repo().await;
        let mut salt = sugar();
        salt.title = "Salt 500g".into();
        let results = repo
            .add_bulk(vec![sugar(), salt], Some("Kano Traders".into()))
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(repo.all().await.unwrap().len(), 2);
    }
}
