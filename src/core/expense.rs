use serde::{Serialize, Deserialize};
use colored::Colorize;

use crate::core::participant::Participant;
use crate::core::error::{LedgerError, LedgerResult};

pub type Amount = f64;

/// A single line item of a bill, split evenly between its participants.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Expense {
    pub item: String,
    /// Pre-tax value.
    pub amount: Amount,
    pub is_taxable: bool,
    /// Only meaningful when `is_taxable` is set, 0 otherwise.
    pub tax_rate: Amount,
    pub participants: Vec<Participant>
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.2}", self.item.bold(), self.amount)?;
        if self.is_taxable {
            write!(f, " + {:.2}% tax", self.tax_rate * 100.0)?;
        }
        write!(f, "; {}: ", "Split".bold())?;
        let names: Vec<_> = self.participants.iter().map(|p| p.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

impl Expense {
    /// Builds an expense, taxed at `tax_rate` when one is given.
    /// Repeated participants are kept only once.
    pub fn new(item: &str, amount: Amount, tax_rate: Option<Amount>, participants: Vec<Participant>) -> Expense {
        let mut unique: Vec<Participant> = Vec::with_capacity(participants.len());
        for p in participants {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }

        Expense {
            item: item.to_owned(),
            amount,
            is_taxable: tax_rate.is_some(),
            tax_rate: tax_rate.unwrap_or(0.0),
            participants: unique
        }
    }

    /// Checks the fields a user fills in: a label, at least one participant
    /// and sensible numbers.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.item.is_empty() {
            return Err(LedgerError::EmptyField("item"));
        }
        if self.participants.is_empty() {
            return Err(LedgerError::NoParticipants { item: self.item.clone() });
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(LedgerError::InvalidAmount(self.amount));
        }
        // checked even when untaxed: a NaN rate would be saved as null
        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(LedgerError::InvalidTaxRate(self.tax_rate));
        }
        return Ok(());
    }

    /// Tax-inclusive amount.
    pub fn gross(&self) -> Amount {
        if self.is_taxable {
            self.amount * (1.0 + self.tax_rate)
        } else {
            self.amount
        }
    }

    /// Equal part of the gross amount owed by each participant.
    pub fn share_per_participant(&self) -> LedgerResult<Amount> {
        if self.participants.is_empty() {
            return Err(LedgerError::NoParticipants { item: self.item.clone() });
        }
        return Ok(self.gross() / (self.participants.len() as Amount));
    }

    pub fn involves(&self, participant: Participant) -> bool {
        self.participants.contains(&participant)
    }
}
