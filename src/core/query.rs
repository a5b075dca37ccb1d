// what goes over the wire

use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// The text captured from the input at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub text: String,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Whatever JSON the endpoint sent back. Only `output` is ever looked at.
#[derive(Debug, Clone)]
pub struct Reply(Value);

impl Reply {
    pub fn from_slice(body: &[u8]) -> Result<Self, Error> {
        Ok(Self(serde_json::from_slice(body)?))
    }

    /// The markup to render, converted the way a page converts a property
    /// assigned to `innerHTML`: a missing field renders as `undefined`, `null`
    /// as nothing, and scalars as their text. Only a `null` body has no
    /// fields to read at all.
    pub fn output(&self) -> Result<String, Error> {
        match &self.0 {
            Value::Null => Err(Error::NullReply),
            Value::Object(fields) => Ok(fields
                .get("output")
                .map_or_else(|| "undefined".to_string(), markup_text)),
            _ => Ok("undefined".to_string()),
        }
    }
}

fn markup_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(markup_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(body: &str) -> Result<String, Error> {
        Reply::from_slice(body.as_bytes())?.output()
    }

    #[test]
    fn query_body_is_just_text() {
        let body = serde_json::to_string(&Query::new("")).unwrap();
        assert_eq!(body, r#"{"text":""}"#);
    }

    #[test]
    fn string_output_is_taken_verbatim() {
        assert_eq!(output(r#"{"output":"<b>hi</b>","extra":1}"#).unwrap(), "<b>hi</b>");
    }

    #[test]
    fn other_output_values_become_text() {
        assert_eq!(output(r#"{"output":42}"#).unwrap(), "42");
        assert_eq!(output(r#"{"output":true}"#).unwrap(), "true");
        assert_eq!(output(r#"{"output":null}"#).unwrap(), "");
        assert_eq!(output(r#"{"output":["a",1,null]}"#).unwrap(), "a,1,");
        assert_eq!(output(r#"{"output":{"a":1}}"#).unwrap(), "[object Object]");
    }

    #[test]
    fn missing_output_renders_undefined() {
        assert_eq!(output(r#"{"response":"wrong key"}"#).unwrap(), "undefined");
        assert_eq!(output("42").unwrap(), "undefined");
        assert_eq!(output(r#""text""#).unwrap(), "undefined");
    }

    #[test]
    fn null_body_is_an_error() {
        assert!(matches!(output("null"), Err(Error::NullReply)));
    }

    #[test]
    fn non_json_body_is_an_error() {
        assert!(matches!(
            Reply::from_slice(b"<html>502</html>"),
            Err(Error::Json(_))
        ));
    }
}
