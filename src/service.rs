use chrono::{DateTime, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};

use crate::allocation::PaymentAllocator;
use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::events::{Event, EventStore};
use crate::schedule::{effective_term_count, InstallmentSchedule};
use crate::state::{Loan, PaymentReceipt};
use crate::store::EntityStore;
use crate::types::{CurrencyCode, InstallmentStatus, LoanId, UserId};

/// loan service
///
/// Front door of the ledger core: originates loans with their repayment
/// schedules and applies incoming payments. Persistence goes through the
/// [`EntityStore`] collaborator; each call's multi-row writes are expected
/// to run inside one atomic unit of work on that boundary.
pub struct LoanService<S: EntityStore> {
    store: S,
    allocator: PaymentAllocator,
    events: EventStore,
}

impl<S: EntityStore> LoanService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            allocator: PaymentAllocator::new(),
            events: EventStore::new(),
        }
    }

    /// originate a loan and its repayment schedule
    ///
    /// `terms` is normalized to the offered term counts (3 stays 3, anything
    /// else becomes 6) after rejecting a zero request. `processed_at` is
    /// truncated to date semantics for the due-date math.
    pub fn create_loan(
        &mut self,
        user_id: UserId,
        amount: Money,
        currency: CurrencyCode,
        terms: u32,
        processed_at: DateTime<Utc>,
    ) -> Result<Loan> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidLoanAmount { amount });
        }
        if terms == 0 {
            return Err(LedgerError::InvalidTermCount { requested: terms });
        }

        let term_count = effective_term_count(terms);
        let processed_on = processed_at.date_naive();

        let loan = Loan::new(user_id, amount, currency.clone(), term_count, processed_on);
        let schedule =
            InstallmentSchedule::generate(loan.id, amount, currency, term_count, processed_on)?;

        self.events.emit(Event::LoanOriginated {
            loan_id: loan.id,
            user_id,
            principal: amount,
            term_count,
            processed_at: processed_on,
        });
        self.events.emit(Event::InstallmentsScheduled {
            loan_id: loan.id,
            count: term_count,
            total: schedule.total(),
            first_due: schedule.installments[0].due_date,
            last_due: schedule.installments[schedule.installments.len() - 1].due_date,
        });

        self.store.insert_loan(loan.clone())?;
        self.store.insert_installments(schedule.installments)?;

        Ok(loan)
    }

    /// originate a loan processed at the current system time
    pub fn create_loan_now(
        &mut self,
        user_id: UserId,
        amount: Money,
        currency: CurrencyCode,
        terms: u32,
    ) -> Result<Loan> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.create_loan(user_id, amount, currency, terms, time.now())
    }

    /// apply a received payment against a loan
    ///
    /// Recomputes the loan's aggregate balance from the fully settled
    /// installments (partially settled ones are intentionally excluded from
    /// that sum), then distributes the payment across the due installments
    /// oldest-first, and finally records the receipt.
    pub fn repay_loan(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        currency: CurrencyCode,
        received_at: DateTime<Utc>,
    ) -> Result<PaymentReceipt> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidPaymentAmount { amount });
        }

        // aggregate balance update
        let already_fully_repaid = self
            .store
            .sum_installment_amount(loan_id, InstallmentStatus::Repaid)?;
        let mut loan = self
            .store
            .find_loan(loan_id)?
            .ok_or(LedgerError::LoanNotFound { id: loan_id })?;
        loan.set_outstanding(loan.principal - amount - already_fully_repaid);
        self.store.save_loan(&loan)?;
        if loan.is_repaid() {
            self.events.emit(Event::LoanRepaid { loan_id });
        }

        // oldest-first installment allocation
        self.allocator
            .allocate(&mut self.store, loan_id, amount, &mut self.events)?;

        // append-only record of the money received
        let receipt = PaymentReceipt::new(loan_id, amount, currency, received_at);
        self.store.insert_receipt(receipt.clone())?;
        self.events.emit(Event::PaymentReceived {
            loan_id,
            receipt_id: receipt.id,
            amount,
            received_at,
        });

        Ok(receipt)
    }

    /// apply a payment received at the current system time
    pub fn repay_loan_now(
        &mut self,
        loan_id: LoanId,
        amount: Money,
        currency: CurrencyCode,
    ) -> Result<PaymentReceipt> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.repay_loan(loan_id, amount, currency, time.now())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}
