use thiserror::Error;

use crate::decimal::Money;
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid loan amount: {amount}")]
    InvalidLoanAmount {
        amount: Money,
    },

    #[error("invalid term count: {requested}")]
    InvalidTermCount {
        requested: u32,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("allocation exceeds schedule for loan {loan_id}: {unapplied} left with no due installment")]
    AllocationExceedsSchedule {
        loan_id: LoanId,
        unapplied: Money,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
