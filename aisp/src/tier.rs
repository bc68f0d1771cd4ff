use crate::document::{Document, Status};
use serde::Serialize;
use std::fmt;

/// Ordinal quality tier derived from density
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Reject = 0,
    Bronze = 1,
    Silver = 2,
    Gold = 3,
    Platinum = 4,
}

impl Tier {
    /// Lower bounds, highest first; each bound is inclusive
    pub const THRESHOLDS: [(f32, Tier); 4] = [
        (0.75, Tier::Platinum),
        (0.60, Tier::Gold),
        (0.40, Tier::Silver),
        (0.20, Tier::Bronze),
    ];

    pub fn from_density(density: f32) -> Tier {
        Self::THRESHOLDS
            .iter()
            .find(|(bound, _)| density >= *bound)
            .map_or(Tier::Reject, |(_, tier)| *tier)
    }

    pub fn ordinal(self) -> i32 {
        self as i32
    }

    pub fn from_ordinal(ordinal: i32) -> Option<Tier> {
        match ordinal {
            0 => Some(Tier::Reject),
            1 => Some(Tier::Bronze),
            2 => Some(Tier::Silver),
            3 => Some(Tier::Gold),
            4 => Some(Tier::Platinum),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Tier::Reject => "⊘",
            Tier::Bronze => "◊⁻",
            Tier::Silver => "◊",
            Tier::Gold => "◊⁺",
            Tier::Platinum => "◊⁺⁺",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Reject => "REJECT",
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.name())
    }
}

impl Document {
    /// Tier of a validated document; REJECT unless validation succeeded
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn tier(&mut self) -> Tier {
        if self.status != Status::Valid {
            return Tier::Reject;
        }
        if let Some(tier) = self.tier.get() {
            return tier;
        }
        let tier = Tier::from_density(self.density());
        self.tier.fill(tier)
    }
}
