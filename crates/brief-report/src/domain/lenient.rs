//! Lenient field decoders for agent payloads
//!
//! Agent output is untrusted: a number may arrive as `"12.5%"`, a list as a
//! single string, a record as `null`. These decoders never fail; anything
//! they cannot make sense of decodes to "absent" and is dealt with by the
//! guardrails. Use them with `#[serde(default, deserialize_with = "...")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce a JSON value into a number
///
/// Accepts numbers and numeric strings with an optional leading `$`,
/// trailing `%`, `x` suffix and thousands separators.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .trim_end_matches(['%', 'x', 'X'])
                .replace(['$', ',', '_', ' '], "");
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// Coerce a JSON value into text; numbers and booleans are stringified
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Optional number
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

/// Optional text
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_text))
}

/// List of text items; a bare string becomes a one-item list
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_text).collect(),
        Some(other) => coerce_text(&other).into_iter().collect(),
        None => Vec::new(),
    })
}

/// Optional nested record; anything but a JSON object is absent
pub fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok(),
        _ => None,
    })
}

/// List of records
///
/// Every element keeps its slot: `None` marks an element that was not a
/// decodable object, so callers can still count what the agent returned.
pub fn records<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                v @ Value::Object(_) => serde_json::from_value(v).ok(),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "number")]
        n: Option<f64>,
        #[serde(default, deserialize_with = "text")]
        t: Option<String>,
        #[serde(default, deserialize_with = "text_list")]
        l: Vec<String>,
        #[serde(default, deserialize_with = "records")]
        r: Vec<Option<Inner>>,
    }

    #[derive(Debug, Deserialize)]
    struct Inner {
        #[serde(default, deserialize_with = "number")]
        x: Option<f64>,
    }

    #[test]
    fn test_numeric_strings() {
        assert_eq!(coerce_number(&json!("3.2%")), Some(3.2));
        assert_eq!(coerce_number(&json!("$1,234.50")), Some(1234.5));
        assert_eq!(coerce_number(&json!("-12")), Some(-12.0));
        assert_eq!(coerce_number(&json!("1.8x")), Some(1.8));
        assert_eq!(coerce_number(&json!("N/A")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(true)), None);
    }

    #[test]
    fn test_never_fails_on_wrong_types() {
        let sample: Sample = serde_json::from_value(json!({
            "n": {"nested": 1},
            "t": [1, 2],
            "l": "single",
            "r": [{"x": "7"}, "junk", {"x": null}]
        }))
        .unwrap();

        assert_eq!(sample.n, None);
        assert_eq!(sample.t, None);
        assert_eq!(sample.l, vec!["single".to_string()]);
        assert_eq!(sample.r.len(), 3);
        assert_eq!(sample.r[0].as_ref().and_then(|i| i.x), Some(7.0));
        assert!(sample.r[1].is_none());
        assert_eq!(sample.r[2].as_ref().and_then(|i| i.x), None);
    }

    #[test]
    fn test_missing_and_null_fields() {
        let sample: Sample = serde_json::from_value(json!({"n": null})).unwrap();
        assert_eq!(sample.n, None);
        assert_eq!(sample.t, None);
        assert!(sample.l.is_empty());
        assert!(sample.r.is_empty());
    }

    #[test]
    fn test_text_stringifies_scalars() {
        assert_eq!(coerce_text(&json!(42)), Some("42".to_string()));
        assert_eq!(coerce_text(&json!(false)), Some("false".to_string()));
        assert_eq!(coerce_text(&json!(null)), None);
    }
}
