use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::rule::RuleVariant;

/// Energy given to a colony at start-up and on every trigger.
pub const MAX_ENERGY: u32 = 1 << 13;

/// Brightness ramp applied once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fade {
    /// Full brightness level.
    pub max: u8,
    /// Step towards `max` while the colony has energy.
    pub up: u8,
    /// Step towards zero once energy is exhausted.
    pub down: u8,
}

impl Default for Fade {
    fn default() -> Self {
        Self {
            max: 32,
            up: 2,
            down: 1,
        }
    }
}

impl Fade {
    /// Next brightness level from the current one.
    pub fn step(&self, level: u8, alive: bool) -> u8 {
        if alive {
            level.saturating_add(self.up).min(self.max)
        } else {
            level.saturating_sub(self.down)
        }
    }
}

/// How the PRNG seed is extracted from the entropy source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedingMode {
    /// Von Neumann extractor over sample-difference parity.
    #[default]
    Debiased,
    /// Sample-difference parity used as-is. Only for sources known to be unbiased.
    Raw,
}

impl fmt::Display for SeedingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedingMode::Debiased => "debiased",
            SeedingMode::Raw => "raw",
        })
    }
}

impl FromStr for SeedingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debiased" | "vonneumann" | "von-neumann" => Ok(SeedingMode::Debiased),
            "raw" => Ok(SeedingMode::Raw),
            other => Err(Error::UnknownSeeding(other.to_string())),
        }
    }
}

/// Panel configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub rule: RuleVariant,
    pub max_energy: u32,
    pub fade: Fade,
    pub seeding: SeedingMode,
    /// Fire the trigger by itself once the colony has stagnated and faded out.
    pub auto_reseed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rule: RuleVariant::default(),
            max_energy: MAX_ENERGY,
            fade: Fade::default(),
            seeding: SeedingMode::default(),
            auto_reseed: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_energy == 0 {
            return Err(Error::invalid("max_energy", "must be non-zero"));
        }
        if self.fade.max == 0 {
            return Err(Error::invalid("fade.max", "must be non-zero"));
        }
        if self.fade.up == 0 {
            return Err(Error::invalid("fade.up", "must be non-zero"));
        }
        if self.fade.down == 0 {
            return Err(Error::invalid("fade.down", "must be non-zero"));
        }
        Ok(())
    }

    /// Build a configuration from optional string overrides, as read from the
    /// environment. Missing values keep their defaults.
    pub fn from_overrides(
        rule: Option<&str>,
        seeding: Option<&str>,
        auto_reseed: Option<&str>,
    ) -> Result<Self> {
        let mut config = Self::default();
        if let Some(rule) = rule {
            config.rule = rule.parse()?;
        }
        if let Some(seeding) = seeding {
            config.seeding = seeding.parse()?;
        }
        if let Some(flag) = auto_reseed {
            config.auto_reseed = parse_flag(flag)?;
        }
        config.validate()?;
        Ok(config)
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::invalid("auto_reseed", format!("not a boolean: {other}"))),
    }
}
