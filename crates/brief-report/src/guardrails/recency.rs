//! Date parsing and staleness checks

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{Outcome, Rejection};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse the date formats agents commonly produce
///
/// Timestamps with an offset keep the calendar date of that offset.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Vet a record date against the as-of date
///
/// Accepts dates from `as_of - max_age_days` through `as_of` inclusive.
pub fn check_recency(
    field: &'static str,
    raw: Option<&str>,
    as_of: NaiveDate,
    max_age_days: u32,
) -> Outcome<NaiveDate> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Outcome::Rejected(Rejection::Missing { field });
    };

    let Some(date) = parse_date(raw) else {
        return Outcome::Rejected(Rejection::UnparseableDate {
            field,
            raw: raw.to_string(),
        });
    };

    if date > as_of {
        return Outcome::Rejected(Rejection::FutureDated { field, date, as_of });
    }

    if (as_of - date).num_days() > i64::from(max_age_days) {
        return Outcome::Rejected(Rejection::Stale {
            field,
            date,
            as_of,
            max_age_days,
        });
    }

    Outcome::Accepted(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        for raw in [
            "2025-03-04",
            " 2025/03/04 ",
            "March 4, 2025",
            "Mar 4, 2025",
            "4 March 2025",
            "2025-03-04T15:30:00Z",
            "2025-03-04T15:30:00",
            "2025-03-04 15:30:00",
            "2025-03-04T15:30:00+02:00",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{raw}");
        }
    }

    #[test]
    fn test_parse_garbage() {
        for raw in ["", "recently", "2025-13-40", "N/A", "last week"] {
            assert_eq!(parse_date(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let at_edge = (as_of() - Duration::days(120)).format("%Y-%m-%d").to_string();
        let past_edge = (as_of() - Duration::days(121)).format("%Y-%m-%d").to_string();

        assert!(matches!(
            check_recency("published_date", Some(&at_edge), as_of(), 120),
            Outcome::Accepted(_)
        ));
        assert!(matches!(
            check_recency("published_date", Some(&past_edge), as_of(), 120),
            Outcome::Rejected(Rejection::Stale { .. })
        ));
    }

    #[test]
    fn test_same_day_accepted_next_day_rejected() {
        assert_eq!(
            check_recency("d", Some("2025-06-30"), as_of(), 0),
            Outcome::Accepted(as_of())
        );
        assert!(matches!(
            check_recency("d", Some("2025-07-01"), as_of(), 365),
            Outcome::Rejected(Rejection::FutureDated { .. })
        ));
    }

    #[test]
    fn test_four_hundred_days_old_is_stale_for_a_year_window() {
        let raw = (as_of() - Duration::days(400)).to_string();
        assert!(matches!(
            check_recency("transaction_date", Some(&raw), as_of(), 365),
            Outcome::Rejected(Rejection::Stale {
                max_age_days: 365,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_and_unparseable() {
        assert_eq!(
            check_recency("d", None, as_of(), 30),
            Outcome::Rejected(Rejection::Missing { field: "d" })
        );
        assert_eq!(
            check_recency("d", Some("  "), as_of(), 30),
            Outcome::Rejected(Rejection::Missing { field: "d" })
        );
        assert!(matches!(
            check_recency("d", Some("yesterday"), as_of(), 30),
            Outcome::Rejected(Rejection::UnparseableDate { .. })
        ));
    }
}
