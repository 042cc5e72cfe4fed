pub mod participant;
pub mod expense;
pub mod bill;
pub mod ledger;
pub mod error;

pub use participant::Participant;
pub use expense::{Expense, Amount};
pub use bill::{Bill, Store, ParticipantTotals};
pub use ledger::{BillSummary, ExpenseBreakdown};
pub use error::{LedgerError, LedgerResult};
