//! Error types for configuration and parsing.
//!
//! The simulation, PRNG and extraction paths are total and never return
//! errors; only the configuration surface can fail.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Rule name not recognised.
    #[error("unknown rule: {0} (expected `life` or `highlife`)")]
    UnknownRule(String),

    /// Seeding mode not recognised.
    #[error("unknown seeding mode: {0} (expected `debiased` or `raw`)")]
    UnknownSeeding(String),

    /// A configuration field is out of range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    #[must_use]
    pub fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::invalid("max_energy", "must be non-zero");
        assert_eq!(err.to_string(), "invalid max_energy: must be non-zero");
        assert!(Error::UnknownSeeding("fast".into())
            .to_string()
            .contains("fast"));
    }
}
