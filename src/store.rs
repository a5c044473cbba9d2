use std::collections::HashMap;

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::state::{Loan, PaymentReceipt, ScheduledInstallment};
use crate::types::{InstallmentStatus, LoanId};

/// entity store the ledger core reads and writes through
///
/// Atomicity of each operation's multi-row writes and isolation of
/// concurrent repayments against the same loan are the implementor's
/// contract; the core never retries, every failure is fatal to the call.
pub trait EntityStore {
    fn insert_loan(&mut self, loan: Loan) -> Result<()>;
    fn insert_installments(&mut self, installments: Vec<ScheduledInstallment>) -> Result<()>;
    fn insert_receipt(&mut self, receipt: PaymentReceipt) -> Result<()>;

    fn find_loan(&self, id: LoanId) -> Result<Option<Loan>>;
    fn save_loan(&mut self, loan: &Loan) -> Result<()>;

    /// sum of installment face `amount` over this loan's installments with the given status
    fn sum_installment_amount(&self, loan_id: LoanId, status: InstallmentStatus) -> Result<Money>;

    /// the single oldest installment with status `Due`, by ascending sequence
    fn find_oldest_due_installment(&self, loan_id: LoanId)
        -> Result<Option<ScheduledInstallment>>;
    fn save_installment(&mut self, installment: &ScheduledInstallment) -> Result<()>;

    /// all installments of a loan, ordered by ascending sequence
    fn installments_for_loan(&self, loan_id: LoanId) -> Result<Vec<ScheduledInstallment>>;
    fn receipts_for_loan(&self, loan_id: LoanId) -> Result<Vec<PaymentReceipt>>;
}

/// in-memory entity store
///
/// Keeps each loan's installments as an ordered collection keyed by due
/// order, so the aggregate and oldest-due queries are plain scans.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    loans: HashMap<LoanId, Loan>,
    installments: HashMap<LoanId, Vec<ScheduledInstallment>>,
    receipts: HashMap<LoanId, Vec<PaymentReceipt>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityStore for InMemoryLedgerStore {
    fn insert_loan(&mut self, loan: Loan) -> Result<()> {
        self.loans.insert(loan.id, loan);
        Ok(())
    }

    fn insert_installments(&mut self, installments: Vec<ScheduledInstallment>) -> Result<()> {
        for installment in installments {
            let batch = self.installments.entry(installment.loan_id).or_default();
            batch.push(installment);
            batch.sort_by_key(|i| i.sequence);
        }
        Ok(())
    }

    fn insert_receipt(&mut self, receipt: PaymentReceipt) -> Result<()> {
        self.receipts.entry(receipt.loan_id).or_default().push(receipt);
        Ok(())
    }

    fn find_loan(&self, id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.get(&id).cloned())
    }

    fn save_loan(&mut self, loan: &Loan) -> Result<()> {
        self.loans.insert(loan.id, loan.clone());
        Ok(())
    }

    fn sum_installment_amount(&self, loan_id: LoanId, status: InstallmentStatus) -> Result<Money> {
        let total = self
            .installments
            .get(&loan_id)
            .map(|batch| {
                batch
                    .iter()
                    .filter(|i| i.status == status)
                    .map(|i| i.amount)
                    .sum()
            })
            .unwrap_or(Money::ZERO);
        Ok(total)
    }

    fn find_oldest_due_installment(
        &self,
        loan_id: LoanId,
    ) -> Result<Option<ScheduledInstallment>> {
        Ok(self
            .installments
            .get(&loan_id)
            .and_then(|batch| {
                batch
                    .iter()
                    .find(|i| i.status == InstallmentStatus::Due)
                    .cloned()
            }))
    }

    fn save_installment(&mut self, installment: &ScheduledInstallment) -> Result<()> {
        let batch = self
            .installments
            .get_mut(&installment.loan_id)
            .ok_or(LedgerError::Storage {
                message: format!("no installments for loan {}", installment.loan_id),
            })?;
        let slot = batch
            .iter_mut()
            .find(|i| i.id == installment.id)
            .ok_or(LedgerError::Storage {
                message: format!("installment {} not found", installment.id),
            })?;
        *slot = installment.clone();
        Ok(())
    }

    fn installments_for_loan(&self, loan_id: LoanId) -> Result<Vec<ScheduledInstallment>> {
        Ok(self.installments.get(&loan_id).cloned().unwrap_or_default())
    }

    fn receipts_for_loan(&self, loan_id: LoanId) -> Result<Vec<PaymentReceipt>> {
        Ok(self.receipts.get(&loan_id).cloned().unwrap_or_default())
    }
}
