//! Extracting an answer from the webhook reply.
//!
//! The webhook does not commit to a reply shape, so extraction tries, in order:
//! 1. an object with a non-empty string `answer` field,
//! 2. an array whose first element is such an object,
//! 3. a bare string,
//! 4. a literal `"answer": "<value>"` pair anywhere in the serialized reply.
//!
//! Anything else is a miss. Blank answers are misses too.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::base::types::RemoteReply;

/// Matches a single-line, unescaped `"answer": "<value>"` pair.
static ANSWER_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

/// Extract the answer from a reply, if there is a usable one.
pub fn extract_answer(reply: &RemoteReply) -> Option<String> {
    let value = &reply.0;

    let answer = match value {
        Value::Object(_) => answer_field(value),
        Value::Array(items) => items.first().and_then(answer_field),
        Value::String(text) => Some(text.as_str()),
        _ => None,
    };

    answer
        .filter(|a| !a.trim().is_empty())
        .map(str::to_string)
        .or_else(|| answer_from_serialized(value))
}

/// The `answer` field of an object, when it is a non-empty string.
fn answer_field(value: &Value) -> Option<&str> {
    value.get("answer").and_then(Value::as_str).filter(|a| !a.trim().is_empty())
}

/// Last resort: look for the pair in the serialized reply.
///
/// Values containing escapes (quotes, newlines, ...) are not recovered here.
fn answer_from_serialized(value: &Value) -> Option<String> {
    let pattern = ANSWER_PATTERN.get_or_init(|| Regex::new(r#""answer"\s*:\s*"([^"\\]*)""#).ok()).as_ref()?;

    let serialized = serde_json::to_string(value).ok()?;
    let captures = pattern.captures(&serialized)?;
    let answer = captures.get(1)?.as_str();

    if answer.trim().is_empty() { None } else { Some(answer.to_string()) }
}

// Tests.
