use std::collections::BTreeMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Serialize, Deserialize};

use crate::core::participant::Participant;
use crate::core::expense::{Expense, Amount};
use crate::core::error::LedgerResult;

/// How much each participant owes. Always holds an entry for every participant.
pub type ParticipantTotals = BTreeMap<Participant, Amount>;

/// All bills by name, in the order they were created.
pub type Store = IndexMap<String, Bill>;

pub(crate) fn zero_totals() -> ParticipantTotals {
    Participant::ALL.iter().map(|p| (*p, 0.0)).collect()
}

/// A dated list of expenses paid up front by one participant.
/// The bill's name is its key in the [`Store`].
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Bill {
    pub date: NaiveDate,
    pub payer: Participant,
    pub expenses: Vec<Expense>
}

impl Bill {
    pub fn new(date: NaiveDate, payer: Participant) -> Bill {
        Bill { date, payer, expenses: Vec::new() }
    }

    /// Sum of the tax-inclusive amounts of all expenses.
    pub fn total(&self) -> Amount {
        return self.expenses.iter()
            .map(|expense| expense.gross()).sum();
    }

    /// Adds each expense's share to every one of its participants.
    /// Participants left out of every expense stay at 0.
    pub fn participant_totals(&self) -> LedgerResult<ParticipantTotals> {
        let mut totals = zero_totals();

        for expense in &self.expenses {
            let share = expense.share_per_participant()?;
            for participant in &expense.participants {
                *totals.entry(*participant).or_insert(0.0) += share;
            }
        }
        return Ok(totals);
    }
}
