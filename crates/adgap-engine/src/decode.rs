//! Lenient decoding of generative-service responses.
//!
//! Responses may wrap JSON in markdown fences or surround it with prose. The
//! decoders locate the first balanced JSON value of the expected shape and
//! read fields by any of a few accepted spellings. Individual malformed items
//! are dropped; a response with no decodable JSON at all is an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::EngineError;
use crate::services::{ClassificationItem, RawRecommendation, RecommendationResponse};

static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json|JSON)?\s*\n?(.*?)```").expect("valid fence regex")
});

/// Content of the first fenced code block, or the whole text when unfenced.
#[must_use]
pub fn strip_fences(text: &str) -> &str {
    FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str())
        .trim()
}

/// First substring of `text` that is a balanced `open`..`close` span and
/// parses as JSON.
///
/// Brackets inside JSON strings are ignored. When a candidate span fails to
/// parse, scanning resumes at the next opening bracket.
fn first_json_value(text: &str, open: u8, close: u8) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = bytes[start..].iter().position(|&b| b == open) {
        let begin = start + offset;
        if let Some(end) = balanced_end(&bytes[begin..], open, close) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[begin..=begin + end]) {
                return Some(value);
            }
        }
        start = begin + 1;
    }
    None
}

/// Offset of the bracket closing `bytes[0]`, if any.
fn balanced_end(bytes: &[u8], open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        if b == b'"' {
            in_string = true;
        } else if b == open {
            depth += 1;
        } else if b == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Decodes a batch classification response into items.
///
/// # Errors
///
/// Returns [`EngineError::Classification`] when the response contains no JSON
/// array. Array elements without a usable `index` are skipped.
pub fn decode_classification_items(text: &str) -> Result<Vec<ClassificationItem>, EngineError> {
    let body = strip_fences(text);
    let Some(Value::Array(values)) = first_json_value(body, b'[', b']') else {
        return Err(EngineError::Classification(
            "response contained no JSON array".to_string(),
        ));
    };

    let items: Vec<ClassificationItem> = values
        .iter()
        .filter_map(Value::as_object)
        .filter_map(classification_item)
        .collect();

    if items.len() < values.len() {
        tracing::debug!(
            dropped = values.len() - items.len(),
            "dropped malformed classification items"
        );
    }
    Ok(items)
}

fn classification_item(obj: &Map<String, Value>) -> Option<ClassificationItem> {
    let index = index_field(obj, &["index", "idx", "i", "adIndex", "ad_index"])?;
    Some(ClassificationItem {
        index,
        hook_type: string_field(obj, &["hookType", "hook_type", "hook"]),
        headline: string_field(obj, &["headline"]),
        cta: string_field(obj, &["cta", "callToAction", "call_to_action"]),
        offer: string_field(obj, &["offer"]),
        pain_point: string_field(obj, &["painPoint", "pain_point"]),
        audience_signals: list_field(obj, &["audienceSignals", "audience_signals", "audience"]),
        tone: string_field(obj, &["tone"]),
        ad_length: string_field(obj, &["adLength", "ad_length", "length"]),
        trust_signals: list_field(obj, &["trustSignals", "trust_signals"]),
        unique_selling_point: string_field(
            obj,
            &["uniqueSellingPoint", "unique_selling_point", "usp"],
        ),
    })
}

/// Decodes a recommendation response into a narrative and raw items.
///
/// Accepts an object with `recommendations` (plus an optional narrative) or a
/// bare array of recommendation objects.
///
/// # Errors
///
/// Returns [`EngineError::Recommendation`] when neither shape can be found.
pub fn decode_recommendations(text: &str) -> Result<RecommendationResponse, EngineError> {
    let body = strip_fences(text);

    if let Some(Value::Object(obj)) = first_json_value(body, b'{', b'}') {
        if let Some(Value::Array(items)) = field(&obj, &["recommendations", "items"]) {
            return Ok(RecommendationResponse {
                narrative: string_field(&obj, &["narrative", "summary", "explanation"])
                    .unwrap_or_default(),
                recommendations: items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(raw_recommendation)
                    .collect(),
            });
        }
    }

    if let Some(Value::Array(items)) = first_json_value(body, b'[', b']') {
        return Ok(RecommendationResponse {
            narrative: String::new(),
            recommendations: items
                .iter()
                .filter_map(Value::as_object)
                .map(raw_recommendation)
                .collect(),
        });
    }

    Err(EngineError::Recommendation(
        "response contained no recommendations".to_string(),
    ))
}

fn raw_recommendation(obj: &Map<String, Value>) -> RawRecommendation {
    RawRecommendation {
        priority: string_field(obj, &["priority"]),
        action: string_field(obj, &["action", "title"]),
        example: string_field(obj, &["example"]),
        implementation: string_field(obj, &["implementation", "howTo", "how_to"]),
    }
}

fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .filter(|v| !v.is_null())
}

/// Non-blank trimmed string. Numbers and booleans are rendered as text.
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    let text = match field(obj, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// A list of strings; a single string is accepted as a one-element list.
fn list_field(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match field(obj, keys) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn index_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<usize> {
    match field(obj, keys)? {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "decode_test.rs"]
mod tests;
