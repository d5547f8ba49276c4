//! Best-effort JSON extraction from model output.
//!
//! Models often wrap the payload in commentary ("Here is your audit: ...").
//! The extractor takes the greedy outer-brace span, from the first `{` to
//! the last `}`, and parses that. Text without braces is parsed whole.
//! Anything that still fails to parse, or parses to something other than
//! an object, is an [`AuditError::Parse`]; there is no silent fallback to
//! an empty structure.

use serde_json::Value;
use tracing::debug;

use crate::error::{AuditError, Result};

/// Longest excerpt of the raw text quoted in a parse error.
const ERROR_EXCERPT_CHARS: usize = 120;

/// Locate and parse the JSON object embedded in `raw`.
pub fn extract_json(raw: &str) -> Result<Value> {
    let candidate = outer_brace_span(raw).unwrap_or(raw);
    let value: Value = serde_json::from_str(candidate).map_err(|e| {
        debug!(error = %e, "model output is not valid JSON");
        AuditError::Parse(format!("{} (output began: {:?})", e, excerpt(raw)))
    })?;
    if !value.is_object() {
        return Err(AuditError::Parse(format!(
            "expected a JSON object, got {}",
            kind_of(&value)
        )));
    }
    Ok(value)
}

fn outer_brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn excerpt(raw: &str) -> String {
    raw.chars().take(ERROR_EXCERPT_CHARS).collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
