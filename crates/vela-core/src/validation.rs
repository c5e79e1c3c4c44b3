//! # Validation Module
//!
//! Business-rule checks for Vela POS. Every rule here runs *before* a write
//! is issued: a validation failure guarantees the store was not touched.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Desktop shell (form checks, immediate feedback)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rules on typed records                │
//! │  ├── Loan payments may not exceed the outstanding balance              │
//! │  ├── Stock never goes below zero                                       │
//! │  └── Amounts are positive, names are present                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (rev-checked writes, typed bodies)                     │
//! │                                                                         │
//! │  Defense in depth: each layer catches what the one above missed        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use vela_core::validation::check_loan_payment;
//!
//! // 500 outstanding, paying 200 → new balance 300
//! assert_eq!(check_loan_payment(500, 200).unwrap(), 300);
//!
//! // 0 outstanding, paying 100 → rejected, nothing written
//! assert!(check_loan_payment(0, 100).is_err());
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{NewInventoryItem, NewPartner};
use crate::MAX_BULK_ITEMS;

// =============================================================================
// Loan Rules
// =============================================================================

/// Checks a loan payment against the holder's outstanding balance.
///
/// ## Rules
/// - `amount` must be strictly positive
/// - `amount` may not exceed `outstanding` (the balance never goes negative)
///
/// ## Returns
/// The new balance (`outstanding - amount`) when the payment is acceptable.
pub fn check_loan_payment(outstanding: i64, amount: i64) -> ValidationResult<i64> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    let new_balance = outstanding - amount;
    if new_balance < 0 {
        return Err(ValidationError::LoanExceeded {
            outstanding,
            requested: amount,
        });
    }

    Ok(new_balance)
}

// =============================================================================
// Stock Rules
// =============================================================================

/// Checks a stock adjustment (negative delta = sale, positive = restock).
///
/// ## Returns
/// The new stock level when the adjustment keeps it at or above zero.
pub fn check_stock_adjust(title: &str, available: i64, delta: i64) -> ValidationResult<i64> {
    let new_stock = available + delta;
    if new_stock < 0 {
        return Err(ValidationError::StockBelowZero {
            title: title.to_string(),
            available,
            requested: -delta,
        });
    }
    Ok(new_stock)
}

// =============================================================================
// Record Input Validators
// =============================================================================

/// Validates a new inventory item before it is written.
///
/// ## Rules
/// - `title` must not be empty
/// - Prices and stock may not be negative
pub fn validate_new_inventory(item: &NewInventoryItem) -> ValidationResult<()> {
    if item.title.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    for (field, value) in [
        ("costPrice", item.cost_price),
        ("minPrice", item.min_price),
        ("maxPrice", item.max_price),
        ("totalStock", item.total_stock),
    ] {
        if value < 0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a bulk inventory import.
pub fn validate_bulk_inventory(items: &[NewInventoryItem]) -> ValidationResult<()> {
    if items.len() > MAX_BULK_ITEMS {
        return Err(ValidationError::BulkTooLarge {
            count: items.len(),
            max: MAX_BULK_ITEMS,
        });
    }
    for item in items {
        validate_new_inventory(item)?;
    }
    Ok(())
}

/// Validates a new supplier/customer record.
pub fn validate_new_partner(partner: &NewPartner) -> ValidationResult<()> {
    if partner.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    Ok(())
}

/// Validates a monetary amount that must be strictly positive.
pub fn validate_amount(field: &str, amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_payment_within_balance() {
        assert_eq!(check_loan_payment(500, 200).unwrap(), 300);
        assert_eq!(check_loan_payment(500, 500).unwrap(), 0);
    }

    #[test]
    fn test_loan_payment_exceeding_balance_rejected() {
        let err = check_loan_payment(0, 100).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LoanExceeded {
                outstanding: 0,
                requested: 100
            }
        );
    }

    #[test]
    fn test_loan_payment_must_be_positive() {
        assert!(check_loan_payment(500, 0).is_err());
        assert!(check_loan_payment(500, -10).is_err());
    }

    #[test]
    fn test_stock_adjust_blocks_negative() {
        assert_eq!(check_stock_adjust("Sugar", 5, -5).unwrap(), 0);
        assert!(check_stock_adjust("Sugar", 5, -6).is_err());
        assert_eq!(check_stock_adjust("Sugar", 5, 10).unwrap(), 15);
    }

    #[test]
    fn test_new_inventory_requires_title() {
        let item = NewInventoryItem {
            title: "  ".into(),
            cost_price: 100,
            min_price: 120,
            max_price: 150,
            total_stock: 3,
        };
        assert!(validate_new_inventory(&item).is_err());
    }

    #[test]
    fn test_new_inventory_rejects_negative_prices() {
        let item = NewInventoryItem {
            title: "Salt".into(),
            cost_price: -1,
            min_price: 120,
            max_price: 150,
            total_stock: 3,
        };
        assert!(matches!(
            validate_new_inventory(&item),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_bulk_limit() {
        let item = NewInventoryItem {
            title: "Salt".into(),
            cost_price: 1,
            min_price: 2,
            max_price: 3,
            total_stock: 1,
        };
        let items = vec![item; MAX_BULK_ITEMS + 1];
        assert!(matches!(
            validate_bulk_inventory(&items),
            Err(ValidationError::BulkTooLarge { .. })
        ));
    }
}
