//! Pull one JSON object out of free-form generator output.
//!
//! The CLI may answer with a metadata envelope (`--output-format json`), a
//! fenced code block, or bare JSON surrounded by prose. [`extract_object`]
//! peels those layers in that order.

use crate::error::{ForgeError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::sync::OnceLock;

/// How far into the text the `"result"` key must appear for the text to be
/// treated as an envelope.
const ENVELOPE_PROBE_CHARS: usize = 100;

static FENCE_OPEN_RE: OnceLock<Regex> = OnceLock::new();
static FENCE_CLOSE_RE: OnceLock<Regex> = OnceLock::new();

fn fence_open_re() -> &'static Regex {
    FENCE_OPEN_RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+-]*\s*").unwrap())
}

fn fence_close_re() -> &'static Regex {
    FENCE_CLOSE_RE.get_or_init(|| Regex::new(r"\s*```\s*$").unwrap())
}

/// Envelope → fence → outermost braces → JSON object.
pub fn extract_object(raw: &str) -> Result<Map<String, Value>> {
    let payload = unwrap_envelope(raw.trim())?;
    let body = strip_fences(&payload);
    parse_outermost_object(body)
}

/// If `text` looks like a CLI envelope, return its `result` payload;
/// otherwise return `text` unchanged.
///
/// A string `result` is returned as-is. An object `result` (structured
/// output) is re-serialized so the later stages see JSON text.
pub fn unwrap_envelope(text: &str) -> Result<Cow<'_, str>> {
    if !looks_like_envelope(text) {
        return Ok(Cow::Borrowed(text));
    }
    let outer: Value = serde_json::from_str(text)
        .map_err(|e| ForgeError::Parse(format!("malformed envelope: {e}")))?;
    let payload = match outer.get("result") {
        Some(Value::String(s)) => s.clone(),
        Some(v @ Value::Object(_)) => v.to_string(),
        _ => String::new(),
    };
    Ok(Cow::Owned(payload))
}

fn looks_like_envelope(text: &str) -> bool {
    if !text.starts_with('{') {
        return false;
    }
    let probe_end = text
        .char_indices()
        .nth(ENVELOPE_PROBE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..probe_end].contains("\"result\"")
}

/// Remove a leading ```` ```lang ```` marker and a trailing ```` ``` ````.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let start = fence_open_re().find(text).map(|m| m.end()).unwrap_or(0);
    let rest = &text[start..];
    let end = fence_close_re().find(rest).map(|m| m.start()).unwrap_or(rest.len());
    &rest[..end]
}

/// Parse the span from the first `{` to the last `}`.
pub fn parse_outermost_object(text: &str) -> Result<Map<String, Value>> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        return Err(ForgeError::Parse("no JSON object in response".to_string()));
    };
    if end < start {
        return Err(ForgeError::Parse("no JSON object in response".to_string()));
    }
    serde_json::from_str(&text[start..=end]).map_err(|e| ForgeError::Parse(e.to_string()))
}
