pub mod allocation;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod schedule;
pub mod serialization;
pub mod service;
pub mod state;
pub mod store;
pub mod types;

// re-export key types
pub use allocation::{AllocationReport, InstallmentApplication, PaymentAllocator};
pub use decimal::Money;
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use schedule::{effective_term_count, InstallmentSchedule};
pub use serialization::LoanView;
pub use service::LoanService;
pub use state::{Loan, PaymentReceipt, ScheduledInstallment};
pub use store::{EntityStore, InMemoryLedgerStore};
pub use types::{
    CurrencyCode, InstallmentId, InstallmentStatus, LoanId, LoanStatus, ReceiptId, UserId,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
