use std::{fmt, str::FromStr};

use serde::{Serialize, Deserialize};

use crate::core::error::LedgerError;

/// One of the people sharing bills. The group is fixed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Participant {
    Leo,
    Yihua,
    Cyclone,
    Vicky
}

impl Participant {
    /// Every participant, in display order.
    pub const ALL: [Participant; 4] = [
        Participant::Leo,
        Participant::Yihua,
        Participant::Cyclone,
        Participant::Vicky
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Leo => "Leo",
            Self::Yihua => "Yihua",
            Self::Cyclone => "Cyclone",
            Self::Vicky => "Vicky"
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Participant {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL.iter()
            .find(|p| p.name().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| LedgerError::UnknownParticipant(trimmed.to_owned()))
    }
}
