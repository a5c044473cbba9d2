use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{
    CurrencyCode, InstallmentId, InstallmentStatus, LoanId, LoanStatus, ReceiptId, UserId,
};

/// installment loan
///
/// Created once at origination, mutated only by the payment allocator,
/// never deleted. `outstanding_amount` stays within `[0, principal]` and
/// the status flips to `Repaid` exactly when it reaches zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub principal: Money,
    pub currency: CurrencyCode,
    pub term_count: u32,
    pub outstanding_amount: Money,
    pub status: LoanStatus,
    pub processed_at: NaiveDate,
}

impl Loan {
    /// create a freshly originated loan owing its full principal
    pub fn new(
        user_id: UserId,
        principal: Money,
        currency: CurrencyCode,
        term_count: u32,
        processed_at: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            principal,
            currency,
            term_count,
            outstanding_amount: principal,
            status: LoanStatus::Due,
            processed_at,
        }
    }

    pub fn is_repaid(&self) -> bool {
        self.status == LoanStatus::Repaid
    }

    /// set the recomputed aggregate balance; flips to `Repaid` at exactly zero
    pub fn set_outstanding(&mut self, outstanding: Money) {
        self.outstanding_amount = outstanding;
        if outstanding.is_zero() {
            self.status = LoanStatus::Repaid;
        }
    }
}

/// one scheduled partial obligation of a loan's principal
///
/// Batch-created at origination, one per term, ordered by `sequence`
/// ascending (equivalently by due date). Mutated only by the payment
/// allocator, oldest-unpaid-first. Never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub id: InstallmentId,
    pub loan_id: LoanId,
    /// 1-based position in the schedule, the due-order key
    pub sequence: u32,
    pub amount: Money,
    pub outstanding_amount: Money,
    pub currency: CurrencyCode,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
}

impl ScheduledInstallment {
    pub fn new(
        loan_id: LoanId,
        sequence: u32,
        amount: Money,
        currency: CurrencyCode,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            sequence,
            amount,
            outstanding_amount: amount,
            currency,
            due_date,
            status: InstallmentStatus::Due,
        }
    }

    /// settle in full
    pub fn mark_repaid(&mut self) {
        self.outstanding_amount = Money::ZERO;
        self.status = InstallmentStatus::Repaid;
    }

    /// record a partial cover, leaving the uncovered remainder outstanding
    pub fn mark_partial(&mut self, applied: Money) {
        self.outstanding_amount = self.amount - applied;
        self.status = InstallmentStatus::Partial;
    }
}

/// immutable record of money actually received against a loan
///
/// Distinct from the scheduled obligations it pays down; created exactly
/// once per repayment call, append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: ReceiptId,
    pub loan_id: LoanId,
    pub amount: Money,
    pub currency: CurrencyCode,
    pub received_at: DateTime<Utc>,
}

impl PaymentReceipt {
    pub fn new(
        loan_id: LoanId,
        amount: Money,
        currency: CurrencyCode,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            loan_id,
            amount,
            currency,
            received_at,
        }
    }
}
