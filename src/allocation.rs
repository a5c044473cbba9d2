use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::store::EntityStore;
use crate::types::{InstallmentId, InstallmentStatus, LoanId};

/// how the allocation touched one installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentApplication {
    pub installment_id: InstallmentId,
    pub sequence: u32,
    pub status: InstallmentStatus,
    pub outstanding: Money,
}

/// outcome of distributing one payment across a loan's schedule
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationReport {
    pub loan_id: LoanId,
    pub amount: Money,
    pub applications: Vec<InstallmentApplication>,
}

impl AllocationReport {
    /// installments fully settled by this payment
    pub fn settled_count(&self) -> usize {
        self.applications
            .iter()
            .filter(|a| a.status == InstallmentStatus::Repaid)
            .count()
    }
}

/// payment allocator
///
/// Walks the loan's `Due` installments oldest-first and applies the payment
/// under the full-decrement rule: the working remainder drops by each
/// touched installment's full face amount, even when only part of it was
/// covered. A partial application therefore drives the remainder negative,
/// which ends the walk; `Partial` installments are never revisited by a
/// later payment.
pub struct PaymentAllocator;

impl PaymentAllocator {
    pub fn new() -> Self {
        Self
    }

    /// distribute a payment across the loan's due installments
    ///
    /// Fails with `AllocationExceedsSchedule` when the remainder is still
    /// positive and no `Due` installment is left, rather than looping.
    pub fn allocate<S: EntityStore>(
        &self,
        store: &mut S,
        loan_id: LoanId,
        amount: Money,
        events: &mut EventStore,
    ) -> Result<AllocationReport> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        let mut to_allocate = amount;
        let mut applications = Vec::new();

        while to_allocate.is_positive() {
            let Some(mut installment) = store.find_oldest_due_installment(loan_id)? else {
                return Err(LedgerError::AllocationExceedsSchedule {
                    loan_id,
                    unapplied: to_allocate,
                });
            };

            if to_allocate >= installment.amount {
                installment.mark_repaid();
                events.emit(Event::InstallmentRepaid {
                    loan_id,
                    installment_id: installment.id,
                    sequence: installment.sequence,
                    amount: installment.amount,
                });
            } else {
                installment.mark_partial(to_allocate);
                events.emit(Event::InstallmentPartiallyRepaid {
                    loan_id,
                    installment_id: installment.id,
                    sequence: installment.sequence,
                    applied: to_allocate,
                    outstanding: installment.outstanding_amount,
                });
            }
            store.save_installment(&installment)?;

            applications.push(InstallmentApplication {
                installment_id: installment.id,
                sequence: installment.sequence,
                status: installment.status,
                outstanding: installment.outstanding_amount,
            });

            // full-decrement rule
            to_allocate -= installment.amount;
        }

        Ok(AllocationReport {
            loan_id,
            amount,
            applications,
        })
    }
}

impl Default for PaymentAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::InstallmentSchedule;
    use crate::store::InMemoryLedgerStore;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn seed_schedule(store: &mut InMemoryLedgerStore, amount: i64, terms: u32) -> LoanId {
        let loan_id = Uuid::new_v4();
        let schedule = InstallmentSchedule::generate(
            loan_id,
            Money::from_minor(amount),
            "EUR".into(),
            terms,
            NaiveDate::from_ymd_opt(2022, 1, 15).unwrap(),
        )
        .unwrap();
        store.insert_installments(schedule.installments).unwrap();
        loan_id
    }

    #[test]
    fn test_partial_payment_splits_across_installments() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 600, 6);
        let mut events = EventStore::new();

        let report = PaymentAllocator::new()
            .allocate(&mut store, loan_id, Money::from_minor(250), &mut events)
            .unwrap();

        // 250 against 100-each installments: two settled, third partial at 50
        assert_eq!(report.applications.len(), 3);
        assert_eq!(report.settled_count(), 2);

        let installments = store.installments_for_loan(loan_id).unwrap();
        assert_eq!(installments[0].status, InstallmentStatus::Repaid);
        assert_eq!(installments[1].status, InstallmentStatus::Repaid);
        assert_eq!(installments[2].status, InstallmentStatus::Partial);
        assert_eq!(installments[2].outstanding_amount, Money::from_minor(50));
        assert_eq!(installments[3].status, InstallmentStatus::Due);
        assert_eq!(installments[5].status, InstallmentStatus::Due);
    }

    #[test]
    fn test_payment_below_oldest_installment_marks_single_partial() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 600, 6);
        let mut events = EventStore::new();

        let report = PaymentAllocator::new()
            .allocate(&mut store, loan_id, Money::from_minor(40), &mut events)
            .unwrap();

        assert_eq!(report.applications.len(), 1);
        let installments = store.installments_for_loan(loan_id).unwrap();
        assert_eq!(installments[0].status, InstallmentStatus::Partial);
        assert_eq!(installments[0].outstanding_amount, Money::from_minor(60));
        assert!(installments[1..]
            .iter()
            .all(|i| i.status == InstallmentStatus::Due));
    }

    #[test]
    fn test_full_payment_settles_every_installment() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 1000, 3);
        let mut events = EventStore::new();

        let report = PaymentAllocator::new()
            .allocate(&mut store, loan_id, Money::from_minor(1000), &mut events)
            .unwrap();

        assert_eq!(report.settled_count(), 3);
        assert!(store
            .installments_for_loan(loan_id)
            .unwrap()
            .iter()
            .all(|i| i.status == InstallmentStatus::Repaid && i.outstanding_amount.is_zero()));
    }

    #[test]
    fn test_exhausted_schedule_fails_instead_of_looping() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 600, 6);
        let mut events = EventStore::new();
        let allocator = PaymentAllocator::new();

        allocator
            .allocate(&mut store, loan_id, Money::from_minor(600), &mut events)
            .unwrap();

        let result = allocator.allocate(&mut store, loan_id, Money::from_minor(100), &mut events);
        assert!(matches!(
            result,
            Err(LedgerError::AllocationExceedsSchedule { unapplied, .. })
                if unapplied == Money::from_minor(100)
        ));
    }

    #[test]
    fn test_partial_installment_not_revisited() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 600, 6);
        let mut events = EventStore::new();
        let allocator = PaymentAllocator::new();

        allocator
            .allocate(&mut store, loan_id, Money::from_minor(40), &mut events)
            .unwrap();

        // next payment skips the partial and lands on installment 2
        allocator
            .allocate(&mut store, loan_id, Money::from_minor(100), &mut events)
            .unwrap();

        let installments = store.installments_for_loan(loan_id).unwrap();
        assert_eq!(installments[0].status, InstallmentStatus::Partial);
        assert_eq!(installments[0].outstanding_amount, Money::from_minor(60));
        assert_eq!(installments[1].status, InstallmentStatus::Repaid);
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let mut store = InMemoryLedgerStore::new();
        let loan_id = seed_schedule(&mut store, 600, 6);
        let mut events = EventStore::new();

        let result =
            PaymentAllocator::new().allocate(&mut store, loan_id, Money::ZERO, &mut events);
        assert!(matches!(
            result,
            Err(LedgerError::InvalidPaymentAmount { .. })
        ));
    }
}
