use thiserror::Error;

use crate::core::Amount;

#[derive(Debug, Error, PartialEq)]
pub enum LedgerError {
    /// Occurs when computing shares of an expense nobody takes part in.
    #[error("expense '{item}' has no participants to split between")]
    NoParticipants {
        item: String
    },
    /// Occurs when a name does not belong to the group.
    #[error("no such participant: {0}")]
    UnknownParticipant(String),
    /// Occurs when a required text field is left blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// A new expense has to cost something.
    #[error("amount must not be zero")]
    ZeroAmount,
    #[error("amount must be a non-negative number, got {0}")]
    InvalidAmount(Amount),
    #[error("tax rate must be between 0 and 1, got {0}")]
    InvalidTaxRate(Amount),
    #[error("no such bill: {0}")]
    NoSuchBill(String),
    /// Occurs when addressing an expense by an index past the end of a bill.
    #[error("bill '{bill}' has no expense at index {index}")]
    NoSuchExpense {
        bill: String,
        index: usize
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
