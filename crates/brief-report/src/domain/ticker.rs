//! Ticker symbols

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_TICKER_LEN: usize = 10;

/// A normalised, upper-case ticker symbol such as `AAPL` or `BRK-B`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalise a ticker symbol
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let symbol = raw.as_ref().trim().to_uppercase();

        let valid = !symbol.is_empty()
            && symbol.len() <= MAX_TICKER_LEN
            && symbol.starts_with(|c: char| c.is_ascii_alphanumeric())
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        if valid {
            Ok(Self(symbol))
        } else {
            Err(ReportError::InvalidTicker(raw.as_ref().to_string()))
        }
    }

    /// Symbol as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse a comma- or whitespace-separated list of symbols
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        raw.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(Self::new)
            .collect()
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ticker {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = ReportError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}
