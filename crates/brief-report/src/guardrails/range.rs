//! Numeric range rules

use serde::{Deserialize, Serialize};

use super::{Outcome, Rejection};

/// Plausible range for a metric, with clamp tolerances
///
/// Values inside `[min, max]` pass. A value below `min` by at most
/// `clamp_below` (or above `max` by at most `clamp_above`) is clamped to
/// the bound. Anything further out, and anything non-finite, is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeRule {
    pub min: f64,
    pub max: f64,
    #[serde(default)]
    pub clamp_below: f64,
    #[serde(default)]
    pub clamp_above: f64,
}

impl RangeRule {
    /// Strict rule: no clamping on either side
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            clamp_below: 0.0,
            clamp_above: 0.0,
        }
    }

    /// Set clamp tolerances
    pub const fn with_clamp(mut self, below: f64, above: f64) -> Self {
        self.clamp_below = below;
        self.clamp_above = above;
        self
    }

    /// Vet a value against the rule
    pub fn check(&self, field: &'static str, value: f64) -> Outcome<f64> {
        if !value.is_finite() {
            return Outcome::Rejected(Rejection::NotFinite { field });
        }

        if value < self.min {
            if self.min - value <= self.clamp_below {
                return Outcome::Clamped {
                    value: self.min,
                    original: value,
                };
            }
            return Outcome::Rejected(self.out_of_range(field, value));
        }

        if value > self.max {
            if value - self.max <= self.clamp_above {
                return Outcome::Clamped {
                    value: self.max,
                    original: value,
                };
            }
            return Outcome::Rejected(self.out_of_range(field, value));
        }

        Outcome::Accepted(value)
    }

    /// Vet an optional value; absence is a rejection
    pub fn check_opt(&self, field: &'static str, value: Option<f64>) -> Outcome<f64> {
        match value {
            Some(v) => self.check(field, v),
            None => Outcome::Rejected(Rejection::Missing { field }),
        }
    }

    /// Check the rule itself is usable
    pub fn validate(&self, name: &str) -> Result<(), String> {
        let finite = [self.min, self.max, self.clamp_below, self.clamp_above]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(format!("{name}: bounds must be finite"));
        }
        if self.min > self.max {
            return Err(format!("{name}: min {} exceeds max {}", self.min, self.max));
        }
        if self.clamp_below < 0.0 || self.clamp_above < 0.0 {
            return Err(format!("{name}: clamp tolerances must not be negative"));
        }
        Ok(())
    }

    fn out_of_range(&self, field: &'static str, value: f64) -> Rejection {
        Rejection::OutOfRange {
            field,
            value,
            min: self.min,
            max: self.max,
        }
    }
}

/// Finite-number check for unbounded metrics (beta, P/E, ...)
pub fn finite(field: &'static str, value: Option<f64>) -> Outcome<f64> {
    match value {
        None => Outcome::Rejected(Rejection::Missing { field }),
        Some(v) if v.is_finite() => Outcome::Accepted(v),
        Some(_) => Outcome::Rejected(Rejection::NotFinite { field }),
    }
}

/// Strictly positive check for prices and volumes
pub fn positive(field: &'static str, value: Option<f64>) -> Outcome<f64> {
    finite(field, value).and_then(|v| {
        if v > 0.0 {
            Outcome::Accepted(v)
        } else {
            Outcome::Rejected(Rejection::NotPositive { field, value: v })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOL: RangeRule = RangeRule::new(0.0, 100.0).with_clamp(0.0, 10.0);

    #[test]
    fn test_inside_range_accepted() {
        assert_eq!(VOL.check("vol", 0.0), Outcome::Accepted(0.0));
        assert_eq!(VOL.check("vol", 42.5), Outcome::Accepted(42.5));
        assert_eq!(VOL.check("vol", 100.0), Outcome::Accepted(100.0));
    }

    #[test]
    fn test_mild_excursion_clamps() {
        assert_eq!(
            VOL.check("vol", 104.0),
            Outcome::Clamped {
                value: 100.0,
                original: 104.0
            }
        );
        // exactly at the tolerance edge still clamps
        assert!(VOL.check("vol", 110.0).is_clamped());
    }

    #[test]
    fn test_implausible_magnitude_rejects() {
        assert!(matches!(
            VOL.check("vol", 250.0),
            Outcome::Rejected(Rejection::OutOfRange { value, .. }) if value == 250.0
        ));
        // no tolerance below zero: negative volatility is never clamped
        assert!(VOL.check("vol", -0.01).is_rejected());
    }

    #[test]
    fn test_non_finite_rejects() {
        assert_eq!(
            VOL.check("vol", f64::NAN),
            Outcome::Rejected(Rejection::NotFinite { field: "vol" })
        );
        assert!(VOL.check("vol", f64::INFINITY).is_rejected());
    }

    #[test]
    fn test_clamp_stays_in_bounds_and_is_idempotent() {
        let rule = RangeRule::new(-1.0, 1.0).with_clamp(0.25, 0.25);
        let mut v = -2.0;
        while v <= 2.0 {
            if let Some(once) = rule.check("score", v).ok() {
                assert!((rule.min..=rule.max).contains(&once), "{v} -> {once}");
                assert_eq!(rule.check("score", once), Outcome::Accepted(once));
            }
            v += 0.01;
        }
    }

    #[test]
    fn test_check_opt_missing() {
        assert_eq!(
            VOL.check_opt("vol", None),
            Outcome::Rejected(Rejection::Missing { field: "vol" })
        );
    }

    #[test]
    fn test_rule_validation() {
        assert!(VOL.validate("vol").is_ok());
        assert!(RangeRule::new(5.0, 1.0).validate("bad").is_err());
        assert!(RangeRule::new(0.0, 1.0).with_clamp(-1.0, 0.0).validate("bad").is_err());
        assert!(RangeRule::new(f64::NAN, 1.0).validate("bad").is_err());
    }

    #[test]
    fn test_positive() {
        assert_eq!(positive("price", Some(12.0)), Outcome::Accepted(12.0));
        assert!(positive("price", Some(0.0)).is_rejected());
        assert!(positive("price", Some(-3.0)).is_rejected());
        assert!(positive("price", None).is_rejected());
        assert!(finite("beta", Some(f64::NAN)).is_rejected());
    }
}
