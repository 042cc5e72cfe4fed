//! Read-only views over bills: the overview of every bill and the
//! per-expense breakdown of a single one.

use std::fmt;

use chrono::NaiveDate;
use colored::Colorize;
use serde::Serialize;

use crate::core::participant::Participant;
use crate::core::expense::{Expense, Amount};
use crate::core::bill::{Bill, Store, ParticipantTotals, zero_totals};
use crate::core::error::LedgerResult;

/// One row of the overview.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct BillSummary {
    pub name: String,
    pub date: NaiveDate,
    pub payer: Participant,
    pub total: Amount,
    pub totals: ParticipantTotals
}

impl BillSummary {
    pub fn new(name: &str, bill: &Bill) -> LedgerResult<BillSummary> {
        Ok(BillSummary {
            name: name.to_owned(),
            date: bill.date,
            payer: bill.payer,
            total: bill.total(),
            totals: bill.participant_totals()?
        })
    }
}

impl fmt::Display for BillSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, paid by {}): {:.2}",
            self.name.bold(), self.date, self.payer, self.total)?;
        for (participant, owed) in &self.totals {
            write!(f, "; {}: {:.2}", participant, owed)?;
        }
        return Ok(());
    }
}

/// One summary row per bill, in store order.
pub fn store_summary(store: &Store) -> LedgerResult<Vec<BillSummary>> {
    store.iter()
        .map(|(name, bill)| BillSummary::new(name, bill))
        .collect()
}

/// Detail of a single expense: its gross amount and what each participant
/// owes for it.
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ExpenseBreakdown {
    pub item: String,
    pub amount: Amount,
    pub is_taxable: bool,
    pub tax_rate: Amount,
    pub gross: Amount,
    pub participants: Vec<Participant>,
    pub shares: ParticipantTotals
}

impl ExpenseBreakdown {
    pub fn new(expense: &Expense) -> LedgerResult<ExpenseBreakdown> {
        let share = expense.share_per_participant()?;
        let mut shares = zero_totals();
        for participant in &expense.participants {
            shares.insert(*participant, share);
        }

        Ok(ExpenseBreakdown {
            item: expense.item.clone(),
            amount: expense.amount,
            is_taxable: expense.is_taxable,
            tax_rate: expense.tax_rate,
            gross: expense.gross(),
            participants: expense.participants.clone(),
            shares
        })
    }
}

impl fmt::Display for ExpenseBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}", self.item.bold(), self.amount)?;
        if self.is_taxable {
            write!(f, " at {:.2}% = {:.2}", self.tax_rate * 100.0, self.gross)?;
        } else {
            write!(f, " untaxed")?;
        }
        for participant in &self.participants {
            write!(f, "; {}: {:.2}", participant, self.shares[participant])?;
        }
        return Ok(());
    }
}

/// Breakdown of every expense of a bill, in insertion order.
pub fn bill_breakdown(bill: &Bill) -> LedgerResult<Vec<ExpenseBreakdown>> {
    bill.expenses.iter()
        .map(ExpenseBreakdown::new)
        .collect()
}
