//! Raw agent payloads

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ReportKind;
use crate::guardrails::Rejection;

/// Untrusted response from the report agent for one request
///
/// The body is whatever JSON the agent produced. It is decoded into an
/// all-optional schema and vetted field by field, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentPayload {
    pub kind: ReportKind,
    pub body: Value,
}

impl AgentPayload {
    pub fn new(kind: ReportKind, body: Value) -> Self {
        Self { kind, body }
    }

    /// Decode the body into a lenient schema
    ///
    /// Fails only when the body is not a JSON object at all.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, Rejection> {
        if !self.body.is_object() {
            return Err(Rejection::Malformed(format!(
                "expected a JSON object, got {}",
                json_type_name(&self.body)
            )));
        }
        serde_json::from_value(self.body).map_err(|e| Rejection::Malformed(e.to_string()))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Schema {
        #[serde(default, deserialize_with = "crate::domain::lenient::text")]
        summary: Option<String>,
    }

    #[test]
    fn test_decode_object() {
        let payload = AgentPayload::new(ReportKind::News, json!({"summary": "ok", "extra": 1}));
        let schema: Schema = payload.decode().unwrap();
        assert_eq!(schema.summary.as_deref(), Some("ok"));
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let payload = AgentPayload::new(ReportKind::News, json!(["not", "an", "object"]));
        let err = payload.decode::<Schema>().unwrap_err();
        assert_eq!(
            err,
            Rejection::Malformed("expected a JSON object, got an array".to_string())
        );
    }
}
