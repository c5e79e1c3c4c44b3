//! # Loan Ledger
//!
//! Payments against a supplier's or customer's outstanding loan balance.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              record_payment(holder_id, amount, payment_type)            │
//! │                                                                         │
//! │  1. read holder ──── missing or tombstoned → NotFound, nothing written │
//! │  2. check balance ── amount ≤ 0 or > outstanding → Validation,         │
//! │     nothing written                                                     │
//! │  3. ONE transaction:                                                    │
//! │       holder.loan -= amount   (rev-checked)                             │
//! │       append SUPL-/CUSL- payment document                               │
//! │     both land or neither does                                           │
//! │  4. audit entry with before/after balances                              │
//! │                                                                         │
//! │  The balance can never go negative and a payment document can never     │
//! │  exist without its matching decrement.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Written as two independent puts, a crash between them would strand a
//! decremented balance with no payment record; the transactional pair
//! closes that window.

use tracing::info;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::ident;
use crate::pool::Store;
use vela_core::validation::check_loan_payment;
use vela_core::{HolderKind, LoanPayment, Partner, PaymentType};

/// Result of a recorded loan payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanPaymentOutcome {
    /// Id of the appended payment document.
    pub payment_id: String,
    pub previous_balance: i64,
    pub new_balance: i64,
}

/// Check-and-decrement ledger for one side (suppliers or customers).
#[derive(Debug, Clone)]
pub struct LoanLedger {
    store: Store,
    kind: HolderKind,
}

impl LoanLedger {
    pub fn new(store: Store, kind: HolderKind) -> Self {
        LoanLedger { store, kind }
    }

    /// Raises a holder's loan balance (a credit sale, or goods taken on
    /// account). Rev-checked like every write.
    pub async fn extend_loan(&self, holder_id: &str, amount: i64) -> StoreResult<i64> {
        if amount <= 0 {
            return Err(vela_core::ValidationError::MustBePositive {
                field: "amount".to_string(),
            }
            .into());
        }

        let holder_doc = self.store.get(holder_id).await?;
        if holder_doc.deleted {
            return Err(StoreError::not_found(holder_id));
        }
        let holder: Partner = holder_doc.decode()?;

        let mut updated = holder.clone();
        updated.loan += amount;

        let mut doc = Document::encode(
            self.kind.holder(),
            holder_id.to_string(),
            ident::timestamp_now(),
            &updated,
        )?;
        doc.rev = holder_doc.rev;
        self.store.put(&doc).await?;

        info!(holder = holder_id, amount, balance = updated.loan, "Loan extended");
        self.store
            .audit()
            .record(
                self.kind.category(),
                "Loan Extended",
                format!(
                    "{} took loan CAF{amount}, total loan: CAF{}",
                    holder.name, updated.loan
                ),
            )
            .await;

        Ok(updated.loan)
    }

    /// Records a payment against the holder's outstanding balance.
    ///
    /// ## Failure Modes
    /// - `NotFound`: holder id unknown or tombstoned
    /// - `Validation`: amount not positive, or exceeds the balance
    /// - `Conflict`: holder rewritten between read and write; retry
    ///
    /// Every failure leaves the store untouched.
    pub async fn record_payment(
        &self,
        holder_id: &str,
        amount: i64,
        payment_type: PaymentType,
    ) -> StoreResult<LoanPaymentOutcome> {
        let holder_doc = self.store.get(holder_id).await?;
        if holder_doc.deleted {
            return Err(StoreError::not_found(holder_id));
        }
        let holder: Partner = holder_doc.decode()?;

        let previous_balance = holder.loan;
        let new_balance = check_loan_payment(previous_balance, amount)?;

        let mut updated = holder.clone();
        updated.loan = new_balance;
        let mut holder_write = Document::encode(
            self.kind.holder(),
            holder_id.to_string(),
            ident::timestamp_now(),
            &updated,
        )?;
        holder_write.rev = holder_doc.rev;

        let payment = LoanPayment {
            holder_id: holder_id.to_string(),
            amount,
            payment_type,
        };
        let payment_write = Document::encode(
            self.kind.payment(),
            ident::generate_id(self.kind.payment()),
            ident::timestamp_now(),
            &payment,
        )?;

        let (_, payment_doc) = self.store.put_pair(&holder_write, &payment_write).await?;

        info!(
            holder = holder_id,
            amount,
            previous_balance,
            new_balance,
            "Loan payment recorded"
        );
        self.store
            .audit()
            .record(
                self.kind.category(),
                "Loan Payment",
                format!(
                    "{} paid loan CAF{amount} of CAF{previous_balance}, remaining loan: CAF{new_balance}",
                    self.kind.category()
                ),
            )
            .await;

        Ok(LoanPaymentOutcome {
            payment_id: payment_doc.id,
            previous_balance,
            new_balance,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
