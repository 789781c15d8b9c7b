//! Validation outcomes

use chrono::NaiveDate;
use thiserror::Error;

/// Why a value or record was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("{field} is missing")]
    Missing { field: &'static str },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("{field}={value} is outside the plausible range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field}={value} must be positive")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} '{raw}' is not a recognisable date")]
    UnparseableDate { field: &'static str, raw: String },

    #[error("{field} {date} is more than {max_age_days} days before {as_of}")]
    Stale {
        field: &'static str,
        date: NaiveDate,
        as_of: NaiveDate,
        max_age_days: u32,
    },

    #[error("{field} {date} is after the as-of date {as_of}")]
    FutureDated {
        field: &'static str,
        date: NaiveDate,
        as_of: NaiveDate,
    },

    #[error("{field} '{value}' looks like placeholder data")]
    Placeholder { field: &'static str, value: String },

    #[error("{field} claims '{label}' but the score is {score}")]
    Contradiction {
        field: &'static str,
        label: String,
        score: f64,
    },

    #[error("{0}")]
    Inconsistent(String),

    #[error("none of the {returned} {collection} returned survived validation")]
    Exhausted {
        collection: &'static str,
        returned: usize,
    },

    #[error("payload could not be decoded: {0}")]
    Malformed(String),
}

/// Result of vetting one value
///
/// Clamping keeps the original around so callers can log it; rejection
/// carries the reason. There is no way to get an unvetted value out.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Accepted(T),
    Clamped { value: T, original: T },
    Rejected(Rejection),
}

impl<T> Outcome<T> {
    /// The vetted value, if accepted or clamped
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Accepted(v) | Self::Clamped { value: v, .. } => Some(v),
            Self::Rejected(_) => None,
        }
    }

    /// The vetted value or the rejection reason
    pub fn into_result(self) -> Result<T, Rejection> {
        match self {
            Self::Accepted(v) | Self::Clamped { value: v, .. } => Ok(v),
            Self::Rejected(r) => Err(r),
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    pub fn is_clamped(&self) -> bool {
        matches!(self, Self::Clamped { .. })
    }

    /// Transform the vetted value, keeping the outcome kind
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Outcome<U> {
        match self {
            Self::Accepted(v) => Outcome::Accepted(f(v)),
            Self::Clamped { value, original } => Outcome::Clamped {
                value: f(value),
                original: f(original),
            },
            Self::Rejected(r) => Outcome::Rejected(r),
        }
    }

    /// Chain a further check on an accepted or clamped value
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Self::Accepted(v) | Self::Clamped { value: v, .. } => f(v),
            Self::Rejected(r) => Outcome::Rejected(r),
        }
    }
}
