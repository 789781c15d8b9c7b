//! Report kinds and their output documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six report types produced per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Historical,
    Volatility,
    News,
    Insider,
    Sentiment,
    MarketConditions,
}

impl ReportKind {
    /// Report kinds requested once per ticker, in bundle order
    pub const PER_TICKER: [Self; 5] = [
        Self::Historical,
        Self::Volatility,
        Self::News,
        Self::Insider,
        Self::Sentiment,
    ];

    /// Every report kind, in output order
    pub const ALL: [Self; 6] = [
        Self::Historical,
        Self::Volatility,
        Self::News,
        Self::Insider,
        Self::Sentiment,
        Self::MarketConditions,
    ];

    /// Whether this kind covers the whole ticker universe in one call
    pub fn is_cross_ticker(self) -> bool {
        matches!(self, Self::MarketConditions)
    }

    /// Stable identifier used in logs and prompt template names
    pub fn slug(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Volatility => "volatility",
            Self::News => "news",
            Self::Insider => "insider",
            Self::Sentiment => "sentiment",
            Self::MarketConditions => "market_conditions",
        }
    }

    /// Output file name for the bundle
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Historical => "historical.md",
            Self::Volatility => "volatility.md",
            Self::News => "news.md",
            Self::Insider => "insider_trading.md",
            Self::Sentiment => "sentiment.md",
            Self::MarketConditions => "market_conditions.md",
        }
    }

    /// Document title for the bundle
    pub fn title(self) -> &'static str {
        match self {
            Self::Historical => "Historical Analysis Reports",
            Self::Volatility => "Volatility Analysis Reports",
            Self::News => "News Analysis Reports",
            Self::Insider => "Insider Trading Analysis Reports",
            Self::Sentiment => "Sentiment Analysis Reports",
            Self::MarketConditions => "General Market Conditions Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_unique() {
        let names: HashSet<_> = ReportKind::ALL.iter().map(|k| k.file_name()).collect();
        assert_eq!(names.len(), ReportKind::ALL.len());
    }

    #[test]
    fn test_per_ticker_excludes_market() {
        assert!(!ReportKind::PER_TICKER.contains(&ReportKind::MarketConditions));
        assert!(ReportKind::MarketConditions.is_cross_ticker());
        assert!(ReportKind::PER_TICKER.iter().all(|k| !k.is_cross_ticker()));
    }

    #[test]
    fn test_insider_file_name() {
        assert_eq!(ReportKind::Insider.file_name(), "insider_trading.md");
        assert_eq!(ReportKind::MarketConditions.to_string(), "market_conditions");
    }
}
