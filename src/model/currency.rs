//! Dollar amounts scraped from table cells

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a currency cell
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurrencyError {
    #[error("empty currency cell")]
    Empty,

    #[error("not a currency amount: '{0}'")]
    Malformed(String),

    #[error("negative currency amount: '{0}'")]
    Negative(String),
}

/// A non-negative dollar amount
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(f64);

impl Currency {
    /// Wraps an already-numeric amount, rejecting negative and non-finite values
    pub fn new(value: f64) -> Result<Self, CurrencyError> {
        if !value.is_finite() {
            return Err(CurrencyError::Malformed(value.to_string()));
        }
        if value < 0.0 {
            return Err(CurrencyError::Negative(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Parses a scraped cell such as `"$39.05"` or `" $80,850 "`
    ///
    /// Everything up to the last `$` is discarded, thousands separators are
    /// removed, and surrounding whitespace and letter case are ignored.
    pub fn parse(raw: &str) -> Result<Self, CurrencyError> {
        let lowered = raw.trim().to_lowercase();
        let amount = lowered.rsplit('$').next().unwrap_or_default();
        let digits: String = amount.trim().chars().filter(|c| *c != ',').collect();

        if digits.is_empty() {
            return Err(CurrencyError::Empty);
        }

        let value = digits
            .parse::<f64>()
            .map_err(|_| CurrencyError::Malformed(raw.trim().to_string()))?;

        if value.is_sign_negative() {
            return Err(CurrencyError::Negative(raw.trim().to_string()));
        }
        Self::new(value).map_err(|_| CurrencyError::Malformed(raw.trim().to_string()))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl FromStr for Currency {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
