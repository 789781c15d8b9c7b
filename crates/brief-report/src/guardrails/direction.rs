//! Cross-field consistency between a stated direction and a signed number

use regex::RegexSet;

use super::{Outcome, Rejection};
use crate::error::Result;

// Word stems; each is matched as a whole word, so "fearless" is not "fear"
// and "unfavorable" is not "favorable".
const BULLISH_WORDS: &[&str] = &[
    "bullish",
    "positive",
    "optimistic",
    r"buy(?:s|ing)?",
    r"accumulat(?:e|es|ed|ing|ion)",
    r"greed(?:y)?",
    "upbeat",
    "favou?rable",
    r"upwards?",
    r"uptrends?",
    "rising",
    r"rall(?:y|ies|ying)",
];

const BEARISH_WORDS: &[&str] = &[
    "bearish",
    "negative",
    "pessimistic",
    r"sell(?:s|ing)?",
    "distribution",
    r"fear(?:ful)?",
    "downbeat",
    "unfavou?rable",
    r"downwards?",
    r"downtrends?",
    r"declin(?:e|es|ing)",
    "falling",
];

const NEUTRAL_WORDS: &[&str] = &["neutral", "mixed", "balanced", "flat", "sideways"];

/// Direction claimed by a free-text label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
    /// The label makes no directional claim we recognise
    Unclassified,
}

/// Compiled direction vocabulary
#[derive(Debug, Clone)]
pub struct DirectionLexicon {
    bullish: RegexSet,
    bearish: RegexSet,
    neutral: RegexSet,
}

/// One whole-word pattern per stem
///
/// A hyphen before the word counts as part of it, so "non-negative" makes
/// no bearish claim.
fn word_set(words: &[&str]) -> std::result::Result<RegexSet, regex::Error> {
    RegexSet::new(words.iter().map(|w| format!(r"(?:^|[^\w-])(?:{w})\b")))
}

impl DirectionLexicon {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bullish: word_set(BULLISH_WORDS)?,
            bearish: word_set(BEARISH_WORDS)?,
            neutral: word_set(NEUTRAL_WORDS)?,
        })
    }

    /// Classify a label such as "Moderately Bullish" or "Net selling"
    pub fn classify(&self, label: &str) -> Direction {
        let label = label.to_lowercase();
        let bullish = self.bullish.is_match(&label);
        let bearish = self.bearish.is_match(&label);

        match (bullish, bearish) {
            (true, false) => Direction::Bullish,
            (false, true) => Direction::Bearish,
            (true, true) => Direction::Neutral,
            (false, false) if self.neutral.is_match(&label) => Direction::Neutral,
            (false, false) => Direction::Unclassified,
        }
    }

    /// Reject a label whose direction contradicts the sign of `score`
    ///
    /// A bullish label needs `score >= -tolerance`, a bearish one
    /// `score <= tolerance`. Neutral and unclassified labels never contradict.
    pub fn check(
        &self,
        field: &'static str,
        label: &str,
        score: f64,
        tolerance: f64,
    ) -> Outcome<Direction> {
        let direction = self.classify(label);
        let contradicts = match direction {
            Direction::Bullish => score < -tolerance,
            Direction::Bearish => score > tolerance,
            Direction::Neutral | Direction::Unclassified => false,
        };

        if contradicts || !score.is_finite() {
            Outcome::Rejected(Rejection::Contradiction {
                field,
                label: label.to_string(),
                score,
            })
        } else {
            Outcome::Accepted(direction)
        }
    }
}

impl Default for DirectionLexicon {
    fn default() -> Self {
        Self {
            bullish: word_set(BULLISH_WORDS).unwrap_or_else(|_| RegexSet::empty()),
            bearish: word_set(BEARISH_WORDS).unwrap_or_else(|_| RegexSet::empty()),
            neutral: word_set(NEUTRAL_WORDS).unwrap_or_else(|_| RegexSet::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> DirectionLexicon {
        DirectionLexicon::new().unwrap()
    }

    #[test]
    fn test_classify() {
        let lex = lexicon();
        assert_eq!(lex.classify("Moderately Bullish"), Direction::Bullish);
        assert_eq!(lex.classify("positive"), Direction::Bullish);
        assert_eq!(lex.classify("Net Buying"), Direction::Bullish);
        assert_eq!(lex.classify("BEARISH"), Direction::Bearish);
        assert_eq!(lex.classify("net selling"), Direction::Bearish);
        assert_eq!(lex.classify("Unfavorable"), Direction::Bearish);
        assert_eq!(lex.classify("Neutral"), Direction::Neutral);
        assert_eq!(
            lex.classify("bullish short term, bearish long term"),
            Direction::Neutral
        );
        assert_eq!(lex.classify("Upward"), Direction::Bullish);
        assert_eq!(lex.classify("downtrend"), Direction::Bearish);
        assert_eq!(lex.classify("Steady"), Direction::Unclassified);
    }

    #[test]
    fn test_words_inside_other_words_do_not_count() {
        let lex = lexicon();
        assert_eq!(lex.classify("Fearless rally"), Direction::Bullish);
        assert_eq!(lex.classify("non-negative"), Direction::Unclassified);
        assert_eq!(lex.classify("Buyback-driven"), Direction::Unclassified);
        assert_eq!(lex.classify("Seller exhaustion"), Direction::Unclassified);
        // "Fearless rally" is a bullish claim
        assert!(lex.check("trend", "Fearless rally", -0.4, 0.0).is_rejected());
        assert!(!lex.check("trend", "non-negative", -0.4, 0.0).is_rejected());
    }

    #[test]
    fn test_contradiction_rejected() {
        let lex = lexicon();
        assert!(matches!(
            lex.check("overall_sentiment", "Bullish", -0.6, 0.0),
            Outcome::Rejected(Rejection::Contradiction { .. })
        ));
        assert!(lex.check("overall_sentiment", "Bearish", 0.4, 0.0).is_rejected());
    }

    #[test]
    fn test_consistent_labels_accepted() {
        let lex = lexicon();
        assert_eq!(
            lex.check("s", "Bullish", 0.7, 0.0),
            Outcome::Accepted(Direction::Bullish)
        );
        assert_eq!(
            lex.check("s", "Bearish", -0.2, 0.0),
            Outcome::Accepted(Direction::Bearish)
        );
        assert_eq!(
            lex.check("s", "Neutral", -0.9, 0.0),
            Outcome::Accepted(Direction::Neutral)
        );
        // zero is never a contradiction
        assert!(!lex.check("s", "Bullish", 0.0, 0.0).is_rejected());
    }

    #[test]
    fn test_tolerance() {
        let lex = lexicon();
        assert!(!lex.check("s", "Bullish", -0.04, 0.05).is_rejected());
        assert!(lex.check("s", "Bullish", -0.06, 0.05).is_rejected());
    }

    #[test]
    fn test_default_matches_compiled_lexicon() {
        let lex = DirectionLexicon::default();
        assert_eq!(lex.classify("Net selling"), Direction::Bearish);
        assert_eq!(lex.classify("Rallying"), Direction::Bullish);
    }
}
