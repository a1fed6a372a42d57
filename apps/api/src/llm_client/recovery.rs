//! Structured output recovery — extracts and, when needed, repairs JSON
//! objects embedded in free-form model completions.
//!
//! Models routinely emit reasoning before (or around) the JSON they were
//! asked for, truncate mid-object when they hit the token limit, or leave
//! trailing commas. Recovery runs an ordered ladder of strategies:
//! direct parse of every balanced object → trailing-comma strip plus
//! bracket rebalance → restart from the first `{` in the text. Each
//! strategy returns a `Result`; nothing here panics on malformed input.

use serde_json::Value;
use thiserror::Error;

/// How much of the raw completion we keep for diagnostics.
const RAW_TAIL_CHARS: usize = 1000;

/// No JSON object could be recovered from a completion.
/// Carries the tail of the raw text so the failing output is inspectable
/// without logging the entire (possibly huge) completion.
#[derive(Debug, Error)]
#[error("no valid JSON object could be recovered from model output")]
pub struct RecoveryFailure {
    pub raw_tail: String,
}

impl RecoveryFailure {
    fn from_raw(text: &str) -> Self {
        Self {
            raw_tail: tail_chars(text, RAW_TAIL_CHARS).to_string(),
        }
    }
}

/// Last `n` characters of `text`, respecting char boundaries.
fn tail_chars(text: &str, n: usize) -> &str {
    match text.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Scans for top-level balanced `{...}` spans, left to right.
///
/// Known limitation: every `{`/`}` is treated as structural, including
/// braces inside quoted strings, so an object whose string content
/// contains literal braces will be mis-split. Such candidates simply
/// fail to parse and fall through to the repair ladder.
fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start.take() {
                            spans.push(&text[s..i + ch.len_utf8()]);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    spans
}

/// Extracts every balanced span that parses as a JSON object, in
/// left-to-right order. Unparsable candidates are skipped; the scan
/// never aborts early.
pub fn extract_objects(text: &str) -> Vec<Value> {
    balanced_spans(text)
        .into_iter()
        .filter_map(|span| serde_json::from_str(span).ok())
        .collect()
}

/// Canonical selection: the LAST successfully parsed object. Models
/// frequently emit reasoning (with stray JSON fragments) before the
/// final answer block.
pub fn last_object(text: &str) -> Option<Value> {
    extract_objects(text).pop()
}

/// Removes commas that immediately precede (modulo whitespace) a closing
/// `}` or `]`. Hand-rolled scan; the output is at most as long as the
/// input.
fn strip_trailing_commas(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == ',' {
            let next_structural = chars[i + 1..].iter().find(|c| !c.is_whitespace());
            if matches!(next_structural, Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(ch);
    }

    out
}

/// Appends the closing brackets/braces a truncated candidate is missing:
/// first the excess of `[` over `]`, then the excess of `{` over `}`.
fn rebalance(s: &str) -> String {
    let mut opens_bracket = 0i64;
    let mut opens_brace = 0i64;

    for ch in s.chars() {
        match ch {
            '[' => opens_bracket += 1,
            ']' => opens_bracket -= 1,
            '{' => opens_brace += 1,
            '}' => opens_brace -= 1,
            _ => {}
        }
    }

    let mut out = s.to_string();
    for _ in 0..opens_bracket.max(0) {
        out.push(']');
    }
    for _ in 0..opens_brace.max(0) {
        out.push('}');
    }
    out
}

/// Bounded repair pass: strip trailing commas, rebalance brackets and
/// braces, then retry the parse exactly once.
pub fn repair(candidate: &str) -> Option<Value> {
    let cleaned = rebalance(&strip_trailing_commas(candidate));
    serde_json::from_str(&cleaned).ok()
}

/// Recovers "the" JSON object from a free-form completion, trying
/// strategies in order:
///
/// 1. direct parse of every balanced span, taking the last success;
/// 2. repair of each balanced span, newest first;
/// 3. repair of everything from the first `{` onward (covers truncated
///    output that never closed its top-level object).
pub fn recover(text: &str) -> Result<Value, RecoveryFailure> {
    if let Some(obj) = last_object(text) {
        return Ok(obj);
    }

    for span in balanced_spans(text).iter().rev() {
        if let Some(obj) = repair(span) {
            return Ok(obj);
        }
    }

    if let Some(idx) = text.find('{') {
        if let Some(obj) = repair(&text[idx..]) {
            return Ok(obj);
        }
    }

    Err(RecoveryFailure::from_raw(text))
}
