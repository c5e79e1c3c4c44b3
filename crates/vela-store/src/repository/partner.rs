//! # Partner Repository
//!
//! Suppliers and customers share one record shape and one repository; the
//! [`HolderKind`] passed at construction picks the keyspace partition
//! (`SUP-` or `CUS-`) and the audit category.

use tracing::info;

use crate::document::Document;
use crate::error::StoreResult;
use crate::ident;
use crate::pool::Store;
use crate::repository::Stored;
use vela_core::validation::validate_new_partner;
use vela_core::{HolderKind, LoanPayment, NewPartner, Partner};

/// Typed operations over `SUP-` or `CUS-` documents.
#[derive(Debug, Clone)]
pub struct PartnerRepository {
    store: Store,
    kind: HolderKind,
}

impl PartnerRepository {
    pub fn new(store: Store, kind: HolderKind) -> Self {
        PartnerRepository { store, kind }
    }

    /// Adds a partner with a zero opening loan balance, whatever the caller
    /// sent for it.
    pub async fn add(&self, input: NewPartner) -> StoreResult<Stored<Partner>> {
        validate_new_partner(&input)?;
        let partner = input.into_partner();

        let doc = Document::encode(
            self.kind.holder(),
            ident::generate_id(self.kind.holder()),
            ident::timestamp_now(),
            &partner,
        )?;
        let written = self.store.put(&doc).await?;

        info!(id = %written.id, name = %partner.name, "Partner added");
        self.store
            .audit()
            .record(
                self.kind.category(),
                "Added",
                format!("Added new {}: {}", self.kind.category().to_lowercase(), partner.name),
            )
            .await;

        Stored::from_document(&written)
    }

    /// All live partners of this kind, ascending by id.
    pub async fn all(&self) -> StoreResult<Vec<Stored<Partner>>> {
        let docs = self.store.scan_kind(self.kind.holder()).await?;
        docs.iter().map(Stored::from_document).collect()
    }

    /// Reads one partner by id.
    pub async fn get(&self, id: &str) -> StoreResult<Stored<Partner>> {
        let doc = self.store.get(id).await?;
        Stored::from_document(&doc)
    }

    /// Replaces a partner's record, rev-checked. The loan balance goes
    /// through the loan ledger, not here; this covers name/contact edits.
    pub async fn update(
        &self,
        existing: &Stored<Partner>,
        partner: Partner,
    ) -> StoreResult<Stored<Partner>> {
        let mut doc = Document::encode(
            self.kind.holder(),
            existing.id.clone(),
            ident::timestamp_now(),
            &partner,
        )?;
        doc.rev = existing.rev;
        let written = self.store.put(&doc).await?;

        self.store
            .audit()
            .record(
                self.kind.category(),
                "Updated",
                format!("Updated {}: {}", self.kind.category().to_lowercase(), partner.name),
            )
            .await;

        Stored::from_document(&written)
    }

    /// Soft-deletes a partner.
    pub async fn delete(&self, existing: &Stored<Partner>) -> StoreResult<()> {
        let mut doc = Document::encode(
            self.kind.holder(),
            existing.id.clone(),
            ident::timestamp_now(),
            &existing.record,
        )?;
        doc.rev = existing.rev;
        doc.deleted = true;
        self.store.put(&doc).await?;

        info!(id = %existing.id, "Partner deleted");
        self.store
            .audit()
            .record(
                self.kind.category(),
                "Deleted",
                format!("Deleted {}: {}", self.kind.category().to_lowercase(), existing.record.name),
            )
            .await;

        Ok(())
    }

    /// Payment history for this side of the ledger, ascending by id.
    pub async fn loan_payments(&self) -> StoreResult<Vec<Stored<LoanPayment>>> {
        let docs = self.store.scan_kind(self.kind.payment()).await?;
        docs.iter().map(Stored::from_document).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::StoreConfig;

    fn amina() -> NewPartner {
        NewPartner {
            name: "Amina Stores".into(),
            phoneno: "0700000000".into(),
            address: "Main market".into(),
        }
    }

    #[tokio::test]
    async fn test_supplier_and_customer_partitions_are_disjoint() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        store.suppliers().add(amina()).await.unwrap();
        store.customers().add(amina()).await.unwrap();

        let suppliers = store.suppliers().all().await.unwrap();
        let customers = store.customers().all().await.unwrap();
        assert_eq!(suppliers.len(), 1);
        assert_eq!(customers.len(), 1);
        assert!(suppliers[0].id.starts_with("SUP-"));
        assert!(customers[0].id.starts_with("CUS-"));
    }

    #[tokio::test]
    async fn test_add_forces_zero_loan() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let stored = store.suppliers().add(amina()).await.unwrap();
        assert_eq!(stored.record.loan, 0);
    }

    #[tokio::test]
    async fn test_update_contact_details() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.customers();
        let stored = repo.add(amina()).await.unwrap();

        let mut partner = stored.record.clone();
        partner.phoneno = "0711111111".into();
        let updated = repo.update(&stored, partner).await.unwrap();
        assert_eq!(updated.record.phoneno, "0711111111");
        assert_eq!(updated.rev, stored.rev + 1);
    }

    #[tokio::test]
    async fn test_delete_hides_from_list() {
        let store = Store::open(StoreConfig::in_memory()).await.unwrap();
        let repo = store.suppliers();
        let stored = repo.add(amina()).await.unwrap();
        repo.delete(&stored).await.unwrap();
        assert!(repo.all().await.unwrap().is_empty());
    }
}
