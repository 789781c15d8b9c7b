//! Guardrails for untrusted agent output
//!
//! Every value an agent returns is vetted here before it can reach a
//! report. The checks are pure and total: malformed input produces a
//! [`Rejection`], never an error, and vetting one record has no effect on
//! its siblings.
//!
//! - [`range`]: numeric bounds with clamp-or-reject severity
//! - [`recency`]: date parsing and staleness windows
//! - [`placeholder`]: filler names and sentinel strings
//! - [`direction`]: stated direction vs. signed score

pub mod direction;
pub mod outcome;
pub mod placeholder;
pub mod range;
pub mod recency;

pub use direction::{Direction, DirectionLexicon};
pub use outcome::{Outcome, Rejection};
pub use placeholder::PlaceholderFilter;
pub use range::{RangeRule, finite, positive};
pub use recency::{check_recency, parse_date};

use chrono::NaiveDate;

use crate::config::GuardrailConfig;
use crate::error::Result;

/// Compiled guardrail policy
///
/// Built once per run from a validated [`GuardrailConfig`] and shared by
/// every section renderer.
#[derive(Debug, Clone)]
pub struct Guardrails {
    config: GuardrailConfig,
    placeholders: PlaceholderFilter,
    directions: DirectionLexicon,
}

impl Guardrails {
    /// Validate the policy and compile its placeholder patterns
    pub fn new(config: GuardrailConfig) -> Result<Self> {
        config.validate()?;
        let placeholders =
            PlaceholderFilter::new(&config.placeholder_literals, &config.placeholder_patterns)?;
        Ok(Self {
            config,
            placeholders,
            directions: DirectionLexicon::new()?,
        })
    }

    /// The policy this was compiled from
    pub fn config(&self) -> &GuardrailConfig {
        &self.config
    }

    /// Required text field
    pub fn text(&self, field: &'static str, raw: Option<&str>) -> Outcome<String> {
        self.placeholders.check(field, raw)
    }

    /// Optional text field; placeholders and blanks become `None`
    pub fn text_opt(&self, raw: Option<&str>) -> Option<String> {
        self.placeholders.check("text", raw).ok()
    }

    /// Usable items of a text list
    pub fn list(&self, items: &[String]) -> Vec<String> {
        self.placeholders.retain(items)
    }

    /// Dividend yield in percent
    ///
    /// Values in `[0, dividend_fraction_threshold]` are read as fractions
    /// (0.032 means 3.2%) and scaled before the range rule applies.
    pub fn dividend_yield(&self, raw: Option<f64>) -> Outcome<f64> {
        let threshold = self.config.dividend_fraction_threshold;
        let percent = raw.map(|v| {
            if (0.0..=threshold).contains(&v) {
                v * 100.0
            } else {
                v
            }
        });
        self.config.dividend_yield.check_opt("dividend_yield", percent)
    }

    /// News article date
    pub fn article_date(&self, raw: Option<&str>, as_of: NaiveDate) -> Outcome<NaiveDate> {
        check_recency("published_date", raw, as_of, self.config.news_max_age_days)
    }

    /// Insider filing date
    pub fn filing_date(&self, raw: Option<&str>, as_of: NaiveDate) -> Outcome<NaiveDate> {
        check_recency("transaction_date", raw, as_of, self.config.insider_max_age_days)
    }

    /// Stated direction vs. signed score
    pub fn direction(&self, field: &'static str, label: &str, score: f64) -> Outcome<Direction> {
        self.directions
            .check(field, label, score, self.config.direction_tolerance)
    }
}

impl Default for Guardrails {
    fn default() -> Self {
        Self {
            config: GuardrailConfig::default(),
            placeholders: PlaceholderFilter::default(),
            directions: DirectionLexicon::default(),
        }
    }
}
