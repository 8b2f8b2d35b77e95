//! Decoding of raw stored values into haiku records.
//!
//! The KV store holds whatever bytes were last written under a key. Older
//! writers stored partial or loosely typed documents and occasionally plain
//! text, so decoding never fails. A JSON object always decodes, with each
//! unusable field defaulted on its own; any other value is wrapped in a
//! placeholder and tagged as recovered.

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{Comment, Haiku};

/// Prompt recorded on placeholders built from undecodable values.
pub const RECOVERED_PROMPT: &str = "unknown";

/// Where a [`StoredHaiku`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Parsed from a stored JSON record.
    Decoded,
    /// Synthesized from a value that did not parse.
    Recovered,
}

/// Result of decoding a raw stored value.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredHaiku {
    Decoded(Haiku),
    Recovered {
        haiku: Haiku,
        /// The value exactly as it was read from the store.
        raw: String,
        /// Why the value could not be decoded.
        reason: String,
    },
}

type Fields = serde_json::Map<String, Value>;

/// Build a haiku from a stored JSON object, one field at a time.
///
/// A field that is absent or has the wrong type falls back to its default
/// without affecting its siblings. The id is always the key the value was
/// read from.
fn haiku_from_fields(key: &str, fields: &Fields) -> Haiku {
    let timestamp = fields
        .get("timestamp")
        .and_then(timestamp_field)
        .unwrap_or_else(Utc::now);
    Haiku {
        id: key.to_string(),
        text: fields.get("text").and_then(text_field).unwrap_or_default(),
        prompt: fields.get("prompt").and_then(text_field).unwrap_or_default(),
        timestamp,
        likes: fields.get("likes").map(counter_field).unwrap_or(0),
        dislikes: fields.get("dislikes").map(counter_field).unwrap_or(0),
        comments: fields
            .get("comments")
            .map(|value| comments_field(value, timestamp))
            .unwrap_or_default(),
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// RFC 3339 string or epoch milliseconds.
fn timestamp_field(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

/// Negative, fractional and numeric-string counters are coerced; anything else is 0.
fn counter_field(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|_| 0))
            .unwrap_or_else(|| n.as_f64().map(clamp_float).unwrap_or(0)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(clamp_float))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn clamp_float(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        // `as` saturates at u64::MAX
        value.floor() as u64
    } else {
        0
    }
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

/// Keep every usable entry in order. Objects missing pieces are patched,
/// bare strings become comment text, anything else is dropped.
fn comments_field(value: &Value, fallback: DateTime<Utc>) -> Vec<Comment> {
    let Value::Array(entries) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(fields) => Some(Comment {
                id: fields
                    .get("id")
                    .and_then(text_field)
                    .unwrap_or_else(|| format!("comment_{}", index)),
                text: fields.get("text").and_then(text_field).unwrap_or_default(),
                timestamp: fields
                    .get("timestamp")
                    .and_then(timestamp_field)
                    .unwrap_or(fallback),
            }),
            Value::String(text) => Some(Comment {
                id: format!("comment_{}", index),
                text: text.clone(),
                timestamp: fallback,
            }),
            _ => None,
        })
        .collect()
}

impl StoredHaiku {
    /// Decode the value stored under `key`.
    ///
    /// Any JSON object decodes, field by field. Other values are recovered.
    pub fn decode(key: &str, raw: &str) -> Self {
        let (text, reason) = match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => {
                return StoredHaiku::Decoded(haiku_from_fields(key, &fields));
            }
            // A bare JSON string is shown without its quotes.
            Ok(Value::String(text)) => {
                (text, "expected a JSON object, found a string".to_string())
            }
            Ok(other) => (
                raw.to_string(),
                format!("expected a JSON object, found {}", json_kind(&other)),
            ),
            Err(e) => (raw.to_string(), e.to_string()),
        };
        StoredHaiku::Recovered {
            haiku: Haiku {
                id: key.to_string(),
                text,
                prompt: RECOVERED_PROMPT.to_string(),
                timestamp: Utc::now(),
                likes: 0,
                dislikes: 0,
                comments: Vec::new(),
            },
            raw: raw.to_string(),
            reason,
        }
    }

    pub fn provenance(&self) -> Provenance {
        match self {
            StoredHaiku::Decoded(_) => Provenance::Decoded,
            StoredHaiku::Recovered { .. } => Provenance::Recovered,
        }
    }

    pub fn is_recovered(&self) -> bool {
        self.provenance() == Provenance::Recovered
    }

    pub fn haiku(&self) -> &Haiku {
        match self {
            StoredHaiku::Decoded(haiku) | StoredHaiku::Recovered { haiku, .. } => haiku,
        }
    }

    pub fn into_haiku(self) -> Haiku {
        match self {
            StoredHaiku::Decoded(haiku) | StoredHaiku::Recovered { haiku, .. } => haiku,
        }
    }
}
