//! # Record Types
//!
//! Every document the store holds is one of the record kinds defined here.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Prefix-Partitioned Keyspace                         │
//! │                                                                         │
//! │  One flat, range-queryable keyspace; the id prefix IS the partition:   │
//! │                                                                         │
//! │  INV-202608281312-4821   → InventoryItem                               │
//! │  SAL-202608281315-7730   → Sale                                        │
//! │  REC-202608281315-2209   → Receipt                                     │
//! │  EXP-202608281410-9912   → Expenditure                                 │
//! │  SUP-202608271001-1188   → Partner (supplier, carries loan balance)    │
//! │  SUPL-202608281430-3321  → LoanPayment (against a supplier)            │
//! │  CUS-202608261711-5501   → Partner (customer, carries loan balance)    │
//! │  CUSL-202608281435-8714  → LoanPayment (against a customer)            │
//! │  LOG-202608281435-0067   → LogRecord (append-only audit trail)         │
//! │                                                                         │
//! │  A prefix range scan over "SAL-" .. "SAL-\u{fff0}" plays the role of   │
//! │  a secondary index: there are none.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Typed Bodies?
//! The bodies are serde structs with a fixed field set per kind. A typoed or
//! missing field fails at deserialization instead of silently producing a
//! half-formed document.
//!
//! Serde renames keep the persisted field names identical to what the remote
//! endpoint already holds (`costPrice`, `paymentType`, `SalesID`, ...).

use serde::{Deserialize, Serialize};

use crate::NO_SUPPLIER;

// =============================================================================
// Record Kind
// =============================================================================

/// The kind of a stored document.
///
/// Each kind owns an id prefix (the keyspace partition) and a human-readable
/// `type` tag. The tag is redundant with the prefix and exists for the one
/// cross-kind scan (reports = sales ∪ expenditures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Inventory,
    Sale,
    Receipt,
    Expenditure,
    Supplier,
    SupplierLoan,
    Customer,
    CustomerLoan,
    Log,
}

impl RecordKind {
    /// All record kinds, in prefix order.
    pub const ALL: [RecordKind; 9] = [
        RecordKind::Inventory,
        RecordKind::Sale,
        RecordKind::Receipt,
        RecordKind::Expenditure,
        RecordKind::Supplier,
        RecordKind::SupplierLoan,
        RecordKind::Customer,
        RecordKind::CustomerLoan,
        RecordKind::Log,
    ];

    /// The id prefix for this kind (`INV`, `SAL`, ...).
    pub const fn prefix(self) -> &'static str {
        match self {
            RecordKind::Inventory => "INV",
            RecordKind::Sale => "SAL",
            RecordKind::Receipt => "REC",
            RecordKind::Expenditure => "EXP",
            RecordKind::Supplier => "SUP",
            RecordKind::SupplierLoan => "SUPL",
            RecordKind::Customer => "CUS",
            RecordKind::CustomerLoan => "CUSL",
            RecordKind::Log => "LOG",
        }
    }

    /// The human-readable `type` tag stored alongside every document.
    pub const fn tag(self) -> &'static str {
        match self {
            RecordKind::Inventory => "inventory",
            RecordKind::Sale => "sales",
            RecordKind::Receipt => "receipts",
            RecordKind::Expenditure => "expenditures",
            RecordKind::Supplier => "supplier",
            RecordKind::SupplierLoan => "supplier loan",
            RecordKind::Customer => "customer",
            RecordKind::CustomerLoan => "customer loan",
            RecordKind::Log => "logs",
        }
    }

    /// Resolves a kind from its `type` tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Resolves a kind from a document id.
    ///
    /// Matches on the segment before the first `-`, so `SUP` and `SUPL` can
    /// never be confused even though one is a prefix of the other.
    pub fn of_id(id: &str) -> Option<Self> {
        let prefix = id.split('-').next()?;
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// Payment Type
// =============================================================================

/// How a sale or loan payment was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Physical cash.
    Cash,
    /// Bank transfer.
    Transfer,
    /// Sold on credit; adds to the customer's loan balance.
    Loan,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stocked item available for sale.
///
/// All prices are in minor currency units (never floats). `min_price` and
/// `max_price` bound the price the cashier may choose at the till.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub title: String,
    pub cost_price: i64,
    pub min_price: i64,
    pub max_price: i64,
    /// Units on hand; never negative.
    pub total_stock: i64,
    /// Supplier name, or [`NO_SUPPLIER`] when the item has none.
    pub supplier: String,
}

/// Input for creating an inventory item; supplier is supplied separately
/// and defaulted to [`NO_SUPPLIER`] when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    pub title: String,
    pub cost_price: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub total_stock: i64,
}

impl NewInventoryItem {
    /// Builds the stored record, defaulting the supplier when none is given.
    pub fn into_item(self, supplier: Option<String>) -> InventoryItem {
        InventoryItem {
            title: self.title,
            cost_price: self.cost_price,
            min_price: self.min_price,
            max_price: self.max_price,
            total_stock: self.total_stock,
            supplier: supplier.unwrap_or_else(|| NO_SUPPLIER.to_string()),
        }
    }
}

// =============================================================================
// Sales
// =============================================================================

/// One line of a sale: an inventory reference, a quantity, and the price the
/// cashier chose within the item's min/max band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub inventory_id: String,
    pub title: String,
    pub quantity: i64,
    pub price: i64,
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub items: Vec<SaleLine>,
    /// Customer reference, when the sale is attributed to one.
    #[serde(rename = "customerID", skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Total settled amount, minor units.
    pub amount: i64,
    pub payment_type: PaymentType,
}

// =============================================================================
// Receipts
// =============================================================================

/// A printable receipt wrapping a completed sale.
///
/// `printed` starts `false` and flips to `true` exactly once, on the first
/// successful print acknowledgment. Marking an already printed receipt again
/// is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(rename = "SalesID")]
    pub sales_id: String,
    pub order: Vec<SaleLine>,
    pub amount: i64,
    pub printed: bool,
}

/// Input for issuing a receipt; `printed` is always forced to `false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReceipt {
    #[serde(rename = "SalesID")]
    pub sales_id: String,
    pub order: Vec<SaleLine>,
    pub amount: i64,
}

// =============================================================================
// Expenditures
// =============================================================================

/// Money taken out of the till for a non-sale reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expenditure {
    pub reason: String,
    /// Who took the money.
    pub name: String,
    pub amount: i64,
}

// =============================================================================
// Partners (suppliers and customers)
// =============================================================================

/// A supplier or customer: the two loan-holder kinds share one shape.
///
/// `loan` is the running balance owed; it never goes negative (a payment
/// exceeding the balance is rejected before any write).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    pub name: String,
    pub phoneno: String,
    pub address: String,
    pub loan: i64,
}

/// Input for creating a partner; `loan` is always forced to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartner {
    pub name: String,
    pub phoneno: String,
    pub address: String,
}

impl NewPartner {
    /// Builds the stored record with a zero opening balance.
    pub fn into_partner(self) -> Partner {
        Partner {
            name: self.name,
            phoneno: self.phoneno,
            address: self.address,
            loan: 0,
        }
    }
}

/// Which side of the ledger a loan holder sits on.
///
/// Picks the holder prefix (`SUP`/`CUS`) and the matching payment prefix
/// (`SUPL`/`CUSL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderKind {
    Supplier,
    Customer,
}

impl HolderKind {
    /// Record kind of the holder document.
    pub const fn holder(self) -> RecordKind {
        match self {
            HolderKind::Supplier => RecordKind::Supplier,
            HolderKind::Customer => RecordKind::Customer,
        }
    }

    /// Record kind of the paired payment documents.
    pub const fn payment(self) -> RecordKind {
        match self {
            HolderKind::Supplier => RecordKind::SupplierLoan,
            HolderKind::Customer => RecordKind::CustomerLoan,
        }
    }

    /// Audit category used for this side of the ledger.
    pub const fn category(self) -> &'static str {
        match self {
            HolderKind::Supplier => "Supplier",
            HolderKind::Customer => "Customer",
        }
    }
}

// =============================================================================
// Loan Payments
// =============================================================================

/// A payment against a holder's outstanding loan.
///
/// Always paired with a decrement of the holder's `loan` balance; the pair is
/// written atomically by the loan ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayment {
    /// Id of the supplier/customer this payment settles against.
    pub holder_id: String,
    pub amount: i64,
    pub payment_type: PaymentType,
}

// =============================================================================
// Logs
// =============================================================================

/// One audit-trail entry. Append-only: never updated, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    /// Coarse grouping: "Inventory", "Sales", "Supplier", ...
    pub category: String,
    /// What happened, e.g. "Added new item: Sugar 1kg".
    pub activity: String,
    /// Free-form detail, e.g. before/after loan balances.
    pub message: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_prefix_roundtrip() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_of_id_distinguishes_sup_and_supl() {
        assert_eq!(
            RecordKind::of_id("SUP-202608281200-1234"),
            Some(RecordKind::Supplier)
        );
        assert_eq!(
            RecordKind::of_id("SUPL-202608281200-1234"),
            Some(RecordKind::SupplierLoan)
        );
        assert_eq!(RecordKind::of_id("XYZ-202608281200-1234"), None);
    }

    #[test]
    fn test_receipt_serializes_sales_id_as_legacy_name() {
        let receipt = Receipt {
            sales_id: "SAL-202608281200-1234".into(),
            order: vec![],
            amount: 500,
            printed: false,
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert!(json.get("SalesID").is_some());
        assert_eq!(json["printed"], false);
    }

    #[test]
    fn test_new_item_defaults_supplier_to_nil() {
        let item = NewInventoryItem {
            title: "Sugar 1kg".into(),
            cost_price: 700,
            min_price: 850,
            max_price: 1000,
            total_stock: 24,
        }
        .into_item(None);
        assert_eq!(item.supplier, NO_SUPPLIER);
    }

    #[test]
    fn test_new_partner_opens_with_zero_loan() {
        let partner = NewPartner {
            name: "Amina".into(),
            phoneno: "0700000000".into(),
            address: "Main market".into(),
        }
        .into_partner();
        assert_eq!(partner.loan, 0);
    }

    #[test]
    fn test_holder_kind_pairs() {
        assert_eq!(HolderKind::Supplier.payment(), RecordKind::SupplierLoan);
        assert_eq!(HolderKind::Customer.payment(), RecordKind::CustomerLoan);
    }
}
