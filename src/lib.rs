mod core;
pub mod backend;
pub mod app;
pub mod config;

pub use crate::core::{Bill, Expense, Participant, Store, Amount, ParticipantTotals};
pub use crate::core::{BillSummary, ExpenseBreakdown, LedgerError, LedgerResult};
pub use crate::core::{bill, expense, ledger, participant};
pub use crate::app::{BillBook, AppError, AppResult};
pub use crate::config::AppConfig;
