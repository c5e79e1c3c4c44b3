//! # Error Types
//!
//! Domain-specific error types for vela-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  vela-core errors (this file)                                          │
//! │  └── ValidationError  - Business-rule failures, checked before writes  │
//! │                                                                         │
//! │  vela-store errors (separate crate)                                    │
//! │  └── StoreError       - NotFound / Conflict / Validation / Storage     │
//! │                                                                         │
//! │  vela-sync errors (separate crate)                                     │
//! │  └── SyncError        - Transport and replication failures             │
//! │                                                                         │
//! │  Flow: ValidationError → StoreError → caller branches on the kind      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (balances, ids, field names)
//! 3. Errors are enum variants, never String
//! 4. A validation failure means NO write was performed

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Business-rule validation failures.
///
/// These are the only failures checked *before* any write is issued; a
/// repository that returns one guarantees the store was not touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A loan payment would push the holder balance below zero.
    ///
    /// ## When This Occurs
    /// - Paying 100 against an outstanding loan of 0
    /// - Typo in the payment amount (2000 instead of 200)
    #[error("payment {requested} exceeds outstanding loan {outstanding}")]
    LoanExceeded { outstanding: i64, requested: i64 },

    /// A stock adjustment would push `total_stock` below zero.
    #[error("stock for {title} cannot go below zero: available {available}, requested {requested}")]
    StockBelowZero {
        title: String,
        available: i64,
        requested: i64,
    },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A monetary amount or quantity must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A numeric field may not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Bulk import exceeds the accepted batch size.
    #[error("bulk import of {count} items exceeds the limit of {max}")]
    BulkTooLarge { count: usize, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_exceeded_message() {
        let err = ValidationError::LoanExceeded {
            outstanding: 0,
            requested: 100,
        };
        assert_eq!(err.to_string(), "payment 100 exceeds outstanding loan 0");
    }

    #[test]
    fn test_required_message() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");
    }
}
