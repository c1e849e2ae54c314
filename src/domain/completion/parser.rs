//! Extracts the completion judgment from raw model output.
//!
//! Two encodings are recognised, in order:
//! 1. a fenced ```` ```json ```` block
//! 2. the first balanced `{...}` object in prose with a `"resolved"` key
//!
//! Whichever is found first is authoritative. A fenced block that fails to
//! decode does not fall through to the prose scan.

use std::ops::Range;

use crate::domain::foundation::UnitScore;
use crate::domain::thresholds::completion::MAX_RAW_BYTES;

use super::decision::{CompletionDecision, WireDecision};

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";
const RESOLVED_KEY: &str = "resolved";

/// Where the decision JSON sits in the text.
#[derive(Debug, PartialEq)]
struct Located<'a> {
    span: Range<usize>,
    body: &'a str,
}

/// Parses the completion judgment out of `raw`.
///
/// Returns `None` for missing, malformed or invalid JSON and for input longer
/// than the byte limit. Never panics.
pub fn parse(raw: &str) -> Option<CompletionDecision> {
    if raw.len() > MAX_RAW_BYTES {
        tracing::warn!(bytes = raw.len(), "completion output exceeds size limit");
        return None;
    }

    let cleaned = sanitize(raw);
    let Some(located) = locate(&cleaned) else {
        tracing::debug!("no completion JSON in model output");
        return None;
    };

    let wire: WireDecision = match serde_json::from_str(located.body) {
        Ok(wire) => wire,
        Err(err) => {
            tracing::warn!(error = %err, "completion JSON failed to decode");
            return None;
        }
    };

    let confidence = match UnitScore::try_new(wire.confidence) {
        Ok(confidence) => confidence,
        Err(err) => {
            tracing::warn!(error = %err, "completion confidence out of range");
            return None;
        }
    };

    let decision = CompletionDecision::new(
        wire.resolved,
        confidence,
        wire.next_action.unwrap_or_default(),
        wire.reasoning.unwrap_or_default(),
    );
    tracing::debug!(
        resolved = decision.is_resolved(),
        confidence = %decision.confidence(),
        "completion decision parsed"
    );
    Some(decision)
}

/// Removes the decision JSON so only the advice text remains.
///
/// Text without a recognisable decision is returned sanitized and trimmed.
pub fn strip_decision(raw: &str) -> String {
    let cleaned = sanitize(raw);
    if cleaned.len() > MAX_RAW_BYTES {
        return cleaned.trim().to_string();
    }

    match locate(&cleaned) {
        Some(located) => {
            let mut out = String::with_capacity(cleaned.len());
            out.push_str(cleaned[..located.span.start].trim_end());
            let rest = cleaned[located.span.end..].trim_start();
            if !out.is_empty() && !rest.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(rest);
            out.trim().to_string()
        }
        None => cleaned.trim().to_string(),
    }
}

/// Drops control characters other than newlines and tabs.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
        .collect()
}

fn locate(text: &str) -> Option<Located<'_>> {
    fenced_block(text).or_else(|| resolved_object(text))
}

fn fenced_block(text: &str) -> Option<Located<'_>> {
    let open = text.find(FENCE_OPEN)?;
    let body_start = open + FENCE_OPEN.len();
    let close = body_start + text[body_start..].find(FENCE_CLOSE)?;

    Some(Located {
        span: open..close + FENCE_CLOSE.len(),
        body: text[body_start..close].trim(),
    })
}

/// An object still open during the prose scan.
struct OpenObject {
    start: usize,
    has_key: bool,
}

/// Single pass over `text` with a stack of open objects.
///
/// String literals are only tracked inside an object. The key must sit
/// directly in the object, so nested keys and string values do not count.
fn resolved_object(text: &str) -> Option<Located<'_>> {
    let mut open: Vec<OpenObject> = Vec::new();
    let mut string_start: Option<usize> = None;
    let mut escape_next = false;
    let mut key_pending = false;
    let mut best: Option<Range<usize>> = None;

    for (offset, c) in text.char_indices() {
        if let Some(start) = string_start {
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                string_start = None;
                key_pending = &text[start..offset] == RESOLVED_KEY;
            }
            continue;
        }

        match c {
            '{' => {
                open.push(OpenObject {
                    start: offset,
                    has_key: false,
                });
                key_pending = false;
            }
            '}' => {
                key_pending = false;
                let Some(object) = open.pop() else {
                    continue;
                };
                let earlier = best.as_ref().map_or(true, |b| object.start < b.start);
                if object.has_key && earlier {
                    best = Some(object.start..offset + c.len_utf8());
                }
            }
            '"' if !open.is_empty() => {
                string_start = Some(offset + c.len_utf8());
                key_pending = false;
            }
            ':' if key_pending => {
                if let Some(object) = open.last_mut() {
                    object.has_key = true;
                }
                key_pending = false;
            }
            c if c.is_whitespace() => {}
            _ => key_pending = false,
        }
    }

    best.map(|span| Located {
        body: &text[span.clone()],
        span,
    })
}
