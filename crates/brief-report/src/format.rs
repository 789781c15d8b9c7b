//! Markdown value formatting
//!
//! Formatting never changes a value; it only decides how a vetted value is
//! written. Absent optional values render as [`NOT_AVAILABLE`].

use chrono::NaiveDate;

/// Rendering of an absent optional value
pub const NOT_AVAILABLE: &str = "N/A";

/// Group the digits of a non-negative integer string with commas
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `-0.00` reads as a sign error; render it as zero
fn no_negative_zero(rendered: String) -> String {
    match rendered.strip_prefix('-') {
        Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => rest.to_string(),
        _ => rendered,
    }
}

/// `3.2` -> `3.20%`
pub fn percent(value: f64) -> String {
    no_negative_zero(format!("{value:.2}")) + "%"
}

/// `1.25` -> `+1.25%`, `-0.4` -> `-0.40%`
pub fn signed_percent(value: f64) -> String {
    let body = no_negative_zero(format!("{value:.2}"));
    if body.starts_with('-') {
        format!("{body}%")
    } else {
        format!("+{body}%")
    }
}

/// `1234.5` -> `$1,234.50`, `-1234.56` -> `-$1,234.56`
pub fn currency(value: f64) -> String {
    let rendered = no_negative_zero(format!("{value:.2}"));
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (whole, cents) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// `1234567.0` -> `1,234,567` (rounded to the nearest integer)
pub fn integer(value: f64) -> String {
    let rendered = no_negative_zero(format!("{value:.0}"));
    match rendered.strip_prefix('-') {
        Some(rest) => format!("-{}", group_thousands(rest)),
        None => group_thousands(&rendered),
    }
}

/// `0.8512` -> `0.85`
pub fn ratio(value: f64) -> String {
    no_negative_zero(format!("{value:.2}"))
}

/// ISO `YYYY-MM-DD`
pub fn date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Apply `f` to a present value, or render N/A
pub fn or_na<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), f)
}

/// Comma-joined list, or N/A when empty
pub fn list(items: &[String]) -> String {
    if items.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        items.join(", ")
    }
}

/// Shorten text to at most `max_chars` characters, ending with `...`
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let head: String = text.chars().take(keep).collect();
    format!("{}...", head.trim_end())
}
