//! Placeholder and hallucination detection for text fields

use regex::RegexSet;
use std::collections::HashSet;

use super::{Outcome, Rejection};
use crate::error::Result;

/// Literal values agents emit in place of real data (compared lower-case)
pub const DEFAULT_PLACEHOLDER_LITERALS: &[&str] = &[
    "n/a",
    "na",
    "none",
    "null",
    "nil",
    "unknown",
    "tbd",
    "tba",
    "not available",
    "placeholder",
    "insider name",
    "john doe",
    "jane doe",
    "john smith",
    "jane smith",
    "alice johnson",
    "bob smith",
    "source name",
    "article title",
    "headline",
    "lorem ipsum",
];

/// Patterns for templated or filler values (matched against lower-case text)
pub const DEFAULT_PLACEHOLDER_PATTERNS: &[&str] = &[
    r"^\[.*\]$",
    r"^<.*>$",
    r"^\{.*\}$",
    r"^(insider|executive|officer|director|person|analyst|author|source|article|company|news)\s+(name|title|source|headline)\s*#?\d*$",
    r"^(insider|executive|person|analyst)\s*#?\d+$",
    r"^(x{2,}|\?+|-+|_+|\.+|\*+)$",
    r"lorem ipsum",
    r"^(sample|example|dummy|fake)\b",
];

/// Compiled placeholder filter
#[derive(Debug, Clone)]
pub struct PlaceholderFilter {
    literals: HashSet<String>,
    patterns: RegexSet,
}

impl PlaceholderFilter {
    /// Compile a filter from literal values and regex patterns
    pub fn new<L, P>(literals: L, patterns: P) -> Result<Self>
    where
        L: IntoIterator,
        L::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Ok(Self {
            literals: literals
                .into_iter()
                .map(|l| l.as_ref().trim().to_lowercase())
                .collect(),
            patterns: RegexSet::new(patterns)?,
        })
    }

    /// Whether a raw value is blank or placeholder-like
    pub fn is_placeholder(&self, raw: &str) -> bool {
        let normalised = raw.trim().to_lowercase();
        normalised.is_empty()
            || self.literals.contains(&normalised)
            || self.patterns.is_match(&normalised)
    }

    /// Vet a text field
    pub fn check(&self, field: &'static str, raw: Option<&str>) -> Outcome<String> {
        match raw.map(str::trim) {
            None | Some("") => Outcome::Rejected(Rejection::Missing { field }),
            Some(value) if self.is_placeholder(value) => {
                Outcome::Rejected(Rejection::Placeholder {
                    field,
                    value: value.to_string(),
                })
            }
            Some(value) => Outcome::Accepted(value.to_string()),
        }
    }

    /// Keep the usable items of a text list, in order
    pub fn retain(&self, items: &[String]) -> Vec<String> {
        items
            .iter()
            .map(|item| item.trim())
            .filter(|item| !self.is_placeholder(item))
            .map(str::to_string)
            .collect()
    }
}

impl Default for PlaceholderFilter {
    fn default() -> Self {
        Self {
            literals: DEFAULT_PLACEHOLDER_LITERALS
                .iter()
                .map(|l| (*l).to_string())
                .collect(),
            patterns: RegexSet::new(DEFAULT_PLACEHOLDER_PATTERNS)
                .unwrap_or_else(|_| RegexSet::empty()),
        }
    }
}
