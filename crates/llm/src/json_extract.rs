//! JSON Extraction
//!
//! Pulls the JSON object out of a model reply. Replies may be bare JSON or
//! wrapped in a single markdown code fence.

use serde_json::Value;

use crate::types::{LlmError, LlmResult, StructuredResponse};

/// Return the JSON-bearing part of `text`.
///
/// Looks for a ```` ```json ```` fence first, then any ```` ``` ```` fence
/// (skipping a language tag line), and otherwise returns the whole body.
/// Only one leading/trailing fence pair is stripped.
pub fn extract_json_block(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let after_fence = &text[start + 7..];
        let end = after_fence.find("```").unwrap_or(after_fence.len());
        return after_fence[..end].trim();
    }
    if let Some(start) = text.find("```") {
        let after_fence = &text[start + 3..];
        let end = after_fence.find("```").unwrap_or(after_fence.len());
        return skip_language_tag(&after_fence[..end]).trim();
    }
    text.trim()
}

fn skip_language_tag(block: &str) -> &str {
    let Some(nl) = block.find('\n') else {
        return block;
    };
    let first_line = block[..nl].trim();
    let is_tag = !first_line.is_empty()
        && first_line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if is_tag {
        &block[nl + 1..]
    } else {
        block
    }
}

/// Decode `raw` as a JSON object.
pub fn parse_json_object(raw: &str) -> LlmResult<StructuredResponse> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        LlmError::response(format!(
            "response is not valid JSON: {} (starts with: {:?})",
            e,
            raw.chars().take(100).collect::<String>()
        ))
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(LlmError::response(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Extract the fenced (or bare) JSON from `text` and decode it as an object.
pub fn parse_structured(text: &str) -> LlmResult<StructuredResponse> {
    parse_json_object(extract_json_block(text))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
