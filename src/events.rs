use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{InstallmentId, LoanId, ReceiptId, UserId};

/// all events emitted by ledger operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // origination events
    LoanOriginated {
        loan_id: LoanId,
        user_id: UserId,
        principal: Money,
        term_count: u32,
        processed_at: NaiveDate,
    },
    InstallmentsScheduled {
        loan_id: LoanId,
        count: u32,
        total: Money,
        first_due: NaiveDate,
        last_due: NaiveDate,
    },

    // repayment events
    PaymentReceived {
        loan_id: LoanId,
        receipt_id: ReceiptId,
        amount: Money,
        received_at: DateTime<Utc>,
    },
    InstallmentRepaid {
        loan_id: LoanId,
        installment_id: InstallmentId,
        sequence: u32,
        amount: Money,
    },
    InstallmentPartiallyRepaid {
        loan_id: LoanId,
        installment_id: InstallmentId,
        sequence: u32,
        applied: Money,
        outstanding: Money,
    },
    LoanRepaid {
        loan_id: LoanId,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
