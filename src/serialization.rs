/// serialization support for ledger snapshots
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::store::EntityStore;
use crate::types::{InstallmentStatus, LoanId, LoanStatus, ReceiptId, UserId};

/// serializable view of a loan with its schedule and receipts
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub user_id: UserId,
    pub currency: String,
    pub status: LoanStatus,
    pub processed_at: NaiveDate,
    pub balances: BalanceView,
    pub schedule: Vec<InstallmentView>,
    pub receipts: Vec<ReceiptView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceView {
    pub principal: Money,
    pub outstanding_amount: Money,
    pub scheduled_total: Money,
    pub fully_repaid_total: Money,
    pub received_total: Money,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstallmentView {
    pub sequence: u32,
    pub amount: Money,
    pub outstanding_amount: Money,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReceiptView {
    pub id: ReceiptId,
    pub amount: Money,
    pub received_at: DateTime<Utc>,
}

impl LoanView {
    /// assemble the view from the entity store
    pub fn from_store<S: EntityStore>(store: &S, loan_id: LoanId) -> Result<Self> {
        let loan = store
            .find_loan(loan_id)?
            .ok_or(LedgerError::LoanNotFound { id: loan_id })?;
        let installments = store.installments_for_loan(loan_id)?;
        let receipts = store.receipts_for_loan(loan_id)?;

        let scheduled_total = installments.iter().map(|i| i.amount).sum();
        let fully_repaid_total =
            store.sum_installment_amount(loan_id, InstallmentStatus::Repaid)?;
        let received_total = receipts.iter().map(|r| r.amount).sum();

        Ok(Self {
            id: loan.id,
            user_id: loan.user_id,
            currency: loan.currency.as_str().to_string(),
            status: loan.status,
            processed_at: loan.processed_at,
            balances: BalanceView {
                principal: loan.principal,
                outstanding_amount: loan.outstanding_amount,
                scheduled_total,
                fully_repaid_total,
                received_total,
            },
            schedule: installments
                .into_iter()
                .map(|i| InstallmentView {
                    sequence: i.sequence,
                    amount: i.amount,
                    outstanding_amount: i.outstanding_amount,
                    due_date: i.due_date,
                    status: i.status,
                })
                .collect(),
            receipts: receipts
                .into_iter()
                .map(|r| ReceiptView {
                    id: r.id,
                    amount: r.amount,
                    received_at: r.received_at,
                })
                .collect(),
        })
    }

    /// serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::LoanService;
    use crate::store::InMemoryLedgerStore;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_view_reflects_ledger_state() {
        let mut service = LoanService::new(InMemoryLedgerStore::new());
        let processed = Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap();
        let loan = service
            .create_loan(
                Uuid::new_v4(),
                Money::from_minor(600),
                "EUR".into(),
                6,
                processed,
            )
            .unwrap();
        service
            .repay_loan(loan.id, Money::from_minor(250), "EUR".into(), Utc::now())
            .unwrap();

        let view = LoanView::from_store(service.store(), loan.id).unwrap();
        assert_eq!(view.status, LoanStatus::Due);
        assert_eq!(view.balances.principal, Money::from_minor(600));
        assert_eq!(view.balances.outstanding_amount, Money::from_minor(350));
        assert_eq!(view.balances.scheduled_total, Money::from_minor(600));
        assert_eq!(view.balances.fully_repaid_total, Money::from_minor(200));
        assert_eq!(view.balances.received_total, Money::from_minor(250));
        assert_eq!(view.schedule.len(), 6);
        assert_eq!(view.receipts.len(), 1);

        let json = view.to_json().unwrap();
        let back = LoanView::from_json(&json).unwrap();
        assert_eq!(back.id, view.id);
        assert_eq!(back.balances.outstanding_amount, view.balances.outstanding_amount);
        assert_eq!(back.schedule.len(), view.schedule.len());
    }

    #[test]
    fn test_view_for_unknown_loan_fails() {
        let store = InMemoryLedgerStore::new();
        let result = LoanView::from_store(&store, Uuid::new_v4());
        assert!(matches!(result, Err(LedgerError::LoanNotFound { .. })));
    }
}
