use chrono::{Months, NaiveDate};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::state::ScheduledInstallment;
use crate::types::{CurrencyCode, LoanId};

/// term counts offered by the product: 3 when requested exactly, 6 otherwise
///
/// Any other requested value, above or below, is coerced to 6. Deliberate
/// product simplification; callers must reject a zero request before
/// normalizing.
pub fn effective_term_count(requested: u32) -> u32 {
    if requested == 3 {
        3
    } else {
        6
    }
}

/// generated repayment schedule for a loan
#[derive(Debug, Clone)]
pub struct InstallmentSchedule {
    pub loan_id: LoanId,
    pub principal: Money,
    pub term_count: u32,
    pub start_date: NaiveDate,
    pub installments: Vec<ScheduledInstallment>,
}

impl InstallmentSchedule {
    /// generate the repayment schedule
    ///
    /// Base step is the floor of principal over term count. The walk keeps a
    /// running remainder of the principal; once the remainder drops below one
    /// more step it is folded into the current installment, so the division
    /// residue lands on the final installment instead of the first.
    /// Installment `i` falls due `i` calendar months after `start_date`.
    pub fn generate(
        loan_id: LoanId,
        principal: Money,
        currency: CurrencyCode,
        term_count: u32,
        start_date: NaiveDate,
    ) -> Result<Self> {
        if !principal.is_positive() {
            return Err(LedgerError::InvalidLoanAmount { amount: principal });
        }
        if term_count == 0 {
            return Err(LedgerError::InvalidTermCount { requested: 0 });
        }

        let mut step = principal.floor_div(term_count);
        let mut remaining = principal;
        let mut installments = Vec::with_capacity(term_count as usize);

        for sequence in 1..=term_count {
            remaining -= step;
            if remaining < step {
                step = remaining + step;
            }
            installments.push(ScheduledInstallment::new(
                loan_id,
                sequence,
                step,
                currency.clone(),
                add_months(start_date, sequence)?,
            ));
        }

        Ok(Self {
            loan_id,
            principal,
            term_count,
            start_date,
            installments,
        })
    }

    /// sum of the scheduled installment amounts
    pub fn total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }
}

/// add whole calendar months, clipping the day at short months
fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or(LedgerError::InvalidDate {
            message: format!("{} + {} months overflows the calendar", date, months),
        })
}
