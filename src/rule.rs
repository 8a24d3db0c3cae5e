//! Birth/survival rules on the total-population encoding.
//!
//! `total` is the number of live cells in the full 3×3 Moore neighbourhood
//! *including* the centre cell, so a live cell with `n` neighbours has
//! `total == n + 1` and a dead one has `total == n`.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A Moore-neighbourhood birth/survival rule.
pub trait Rule {
    /// Lowercase rule name, used in logs and configuration.
    const NAME: &'static str;

    /// Next state (0 or 1) of a cell given its neighbourhood total and its
    /// current state.
    fn next_state(total: u32, center: u32) -> u32;
}

/// Conway's Game of Life, B3/S23.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Life;

impl Rule for Life {
    const NAME: &'static str = "life";

    #[inline]
    fn next_state(total: u32, center: u32) -> u32 {
        match total {
            3 => 1,
            4 => center,
            _ => 0,
        }
    }
}

/// HighLife, B36/S23.
///
/// Birth on 6 neighbours only applies to a dead centre, which is `total == 6`
/// with `center == 0`; a live centre at `total == 6` has 5 neighbours and dies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighLife;

impl Rule for HighLife {
    const NAME: &'static str = "highlife";

    #[inline]
    fn next_state(total: u32, center: u32) -> u32 {
        match total {
            3 => 1,
            4 => center,
            6 => center ^ 1,
            _ => 0,
        }
    }
}

/// Rule selection as a configuration value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuleVariant {
    #[default]
    Life,
    HighLife,
}

impl RuleVariant {
    pub fn name(self) -> &'static str {
        match self {
            RuleVariant::Life => Life::NAME,
            RuleVariant::HighLife => HighLife::NAME,
        }
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RuleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "life" | "b3/s23" => Ok(RuleVariant::Life),
            "highlife" | "b36/s23" => Ok(RuleVariant::HighLife),
            other => Err(Error::UnknownRule(other.to_string())),
        }
    }
}
