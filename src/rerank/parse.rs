//! Defensive parsing of LLM rerank responses.
//!
//! Providers return well-formed JSON most of the time, and fenced
//! markdown, object-wrapped arrays, or mid-object truncation the rest of
//! the time. [`parse_rerank_response`] runs an ordered chain of strategies;
//! each is independently unit-testable and a total failure is a
//! [`ParseError`] the caller absorbs into heuristic fallback, never a
//! surfaced error.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
/// Parse failure after every salvage strategy was exhausted.
pub enum ParseError {
    /// No JSON-looking content at all.
    #[error("no JSON found in response")]
    NoJsonFound,

    /// JSON was located but yielded no usable entries.
    #[error("malformed response: {message}")]
    Malformed {
        /// Failure detail.
        message: String,
    },

    /// The response was empty.
    #[error("empty response")]
    Empty,
}

/// One entry as reported by the provider, before identifier recovery.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRanking {
    /// Whatever the provider used as an identifier: real id, 1-based
    /// prompt index, truncated id, or a name.
    pub id: String,
    pub score: f64,
    pub reason: Option<String>,
}

/// Normalizes a reported score to `[0, 100]`.
///
/// Scores at or below 1 are treated as 0–1 fractions and rescaled.
pub fn normalize_score(raw: f64) -> f32 {
    let scaled = if raw <= 1.0 { raw * 100.0 } else { raw };
    scaled.clamp(0.0, 100.0) as f32
}

/// Parses a rank-pass response.
///
/// Strategy order:
/// 1. fenced ```json block, if any, replaces the haystack;
/// 2. direct parse of the haystack;
/// 3. outermost `[...]` span, then outermost `{...}` span;
/// 4. structural repair of a truncated array (keep complete leading
///    objects, drop the cut tail);
/// 5. regex extraction of `{id, score, reason}` triples.
pub fn parse_rerank_response(raw: &str) -> Result<Vec<RawRanking>, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let haystack = extract_fenced_block(raw).unwrap_or(raw);

    if let Ok(value) = serde_json::from_str::<Value>(haystack.trim()) {
        let rankings = rankings_from_value(&value);
        if !rankings.is_empty() {
            return Ok(rankings);
        }
    }

    for span in [extract_span(haystack, '[', ']'), extract_span(haystack, '{', '}')]
        .into_iter()
        .flatten()
    {
        if let Ok(value) = serde_json::from_str::<Value>(span) {
            let rankings = rankings_from_value(&value);
            if !rankings.is_empty() {
                return Ok(rankings);
            }
        }
    }

    if let Some(repaired) = repair_truncated_array(haystack) {
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            let rankings = rankings_from_value(&value);
            if !rankings.is_empty() {
                debug!(
                    recovered = rankings.len(),
                    "Recovered entries from truncated array"
                );
                return Ok(rankings);
            }
        }
    }

    let salvaged = regex_salvage(raw);
    if !salvaged.is_empty() {
        debug!(recovered = salvaged.len(), "Regex salvage recovered entries");
        return Ok(salvaged);
    }

    if haystack.contains('{') || haystack.contains('[') {
        Err(ParseError::Malformed {
            message: "JSON present but no usable ranking entries".to_string(),
        })
    } else {
        Err(ParseError::NoJsonFound)
    }
}

/// Keep/remove partition from the filter pass, in 1-based prompt indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterDecision {
    pub keep: Vec<usize>,
    pub remove: Vec<usize>,
}

/// Parses a filter-pass response (`{"keep": [...], "remove": [...]}`).
pub fn parse_filter_response(raw: &str) -> Result<FilterDecision, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let haystack = extract_fenced_block(raw).unwrap_or(raw);
    let candidate_texts = [
        Some(haystack.trim()),
        extract_span(haystack, '{', '}'),
    ];

    for text in candidate_texts.into_iter().flatten() {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            let keep = index_list(value.get("keep"));
            let remove = index_list(value.get("remove"));
            if keep.is_some() || remove.is_some() {
                return Ok(FilterDecision {
                    keep: keep.unwrap_or_default(),
                    remove: remove.unwrap_or_default(),
                });
            }
        }
    }

    Err(ParseError::Malformed {
        message: "no keep/remove arrays found".to_string(),
    })
}

fn index_list(value: Option<&Value>) -> Option<Vec<usize>> {
    let array = value?.as_array()?;
    Some(
        array
            .iter()
            .filter_map(|v| match v {
                Value::Number(n) => n.as_u64().map(|n| n as usize),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect(),
    )
}

/// Content of the first fenced code block, tolerating a missing closing
/// fence (truncated responses often lose it).
fn extract_fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let after_fence = &raw[start + 3..];
    // Skip an optional language tag up to the first newline.
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => Some(&body[..end]),
        None => Some(body),
    }
}

/// Outermost `open ... close` span, if both brackets are present.
fn extract_span(raw: &str, open: char, close: char) -> Option<&str> {
    let start = raw.find(open)?;
    let end = raw.rfind(close)?;
    (end > start).then(|| &raw[start..=end])
}

/// Rebuilds a truncated JSON array from its syntactically complete leading
/// objects, discarding the cut tail.
fn repair_truncated_array(raw: &str) -> Option<String> {
    let start = raw.find('[')?;
    let body = &raw[start..];

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut last_complete_end: Option<usize> = None;

    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    last_complete_end = Some(i);
                }
            }
            _ => {}
        }
    }

    let end = last_complete_end?;
    let mut repaired = body[..=end].to_string();
    repaired.push(']');
    Some(repaired)
}

static OBJECT_CHUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*\}").expect("static regex compiles"));
static ID_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:id|candidate_id|candidate|name)"\s*:\s*"?([^",}\r\n]+)"?"#)
        .expect("static regex compiles")
});
static SCORE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:score|rating)"\s*:\s*"?(-?[0-9]+(?:\.[0-9]+)?)"?"#)
        .expect("static regex compiles")
});
static REASON_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:reason|rationale|explanation)"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("static regex compiles")
});

/// Last resort: pull `{id, score, reason}` triples out of anything
/// brace-shaped. A truncated trailing object has no closing brace and is
/// skipped by construction.
fn regex_salvage(raw: &str) -> Vec<RawRanking> {
    OBJECT_CHUNK
        .find_iter(raw)
        .filter_map(|chunk| {
            let text = chunk.as_str();
            let id = ID_FIELD.captures(text)?.get(1)?.as_str().trim().to_string();
            let score: f64 = SCORE_FIELD.captures(text)?.get(1)?.as_str().parse().ok()?;
            let reason = REASON_FIELD
                .captures(text)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().replace("\\\"", "\""));
            Some(RawRanking { id, score, reason })
        })
        .collect()
}

/// Extracts ranking entries from a parsed JSON value, accepting bare
/// arrays, wrapper objects (`{"rankings": [...]}`), and single objects.
fn rankings_from_value(value: &Value) -> Vec<RawRanking> {
    match value {
        Value::Array(items) => items.iter().filter_map(ranking_from_value).collect(),
        Value::Object(map) => {
            for key in ["rankings", "results", "candidates", "ranked"] {
                if let Some(Value::Array(items)) = map.get(key) {
                    return items.iter().filter_map(ranking_from_value).collect();
                }
            }
            ranking_from_value(value).into_iter().collect()
        }
        _ => Vec::new(),
    }
}

fn ranking_from_value(value: &Value) -> Option<RawRanking> {
    let obj = value.as_object()?;

    let id = ["id", "candidate_id", "candidate", "index", "name"]
        .iter()
        .find_map(|key| match obj.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })?;

    let score = ["score", "rating", "rank_score"]
        .iter()
        .find_map(|key| match obj.get(*key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        })?;

    let reason = ["reason", "rationale", "explanation"]
        .iter()
        .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string());

    Some(RawRanking { id, score, reason })
}
