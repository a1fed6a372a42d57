//! Placement coaching — prompt construction and normalization of the
//! model's recovered JSON into a well-formed `PlacementFeedback`.
//!
//! Coaching is best-effort: unlike scores, every field here has a
//! deterministic fallback, so normalization never fails. Fallbacks are
//! non-destructive — a present-but-partial list is kept as-is, never
//! padded or truncated.

use serde_json::Value;

use crate::llm_client::prompts::JSON_ONLY_CONTRACT;
use crate::models::evaluation::{PlacementCoaching, PlacementFeedback};

pub const PLACEMENT_MAX_NEW_TOKENS: u32 = 1200;

const FALLBACK_STRENGTH: &str = "Shows basic engagement during the interview";
const FALLBACK_IMPROVEMENT: &str = "Needs more structured and confident explanations";
const FALLBACK_GAP: &str = "Lacks depth or clarity in some responses";
const FALLBACK_ACTIONABLE: &str = "Practice explaining answers step-by-step with examples";
const FALLBACK_FOCUS: &str = "Focus on communication clarity and interview readiness";

/// Keeps `value` only if it is a list with at least one string element;
/// otherwise substitutes the single field-specific fallback.
fn ensure_list(value: Option<&Value>, fallback: &str) -> Vec<String> {
    let provided = value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
    });

    match provided {
        Some(list) if !list.is_empty() => list,
        _ => vec![fallback.to_string()],
    }
}

/// Normalizes a recovered placement-coaching object. `lags` mirrors
/// `placement_coaching.current_gaps` and `focus_areas` mirrors
/// `placement_coaching.placement_focus`; both are read-only aliases for
/// independent consumers, never computed separately.
pub fn normalize_placement(raw: &Value) -> PlacementFeedback {
    let standout_strengths = ensure_list(raw.get("standout_strengths"), FALLBACK_STRENGTH);
    let top_improvements = ensure_list(raw.get("top_improvements"), FALLBACK_IMPROVEMENT);

    let coaching_raw = raw.get("placement_coaching");
    let field = |name: &str| coaching_raw.and_then(|c| c.get(name));

    let coaching = PlacementCoaching {
        current_gaps: ensure_list(field("current_gaps"), FALLBACK_GAP),
        actionable_improvements: ensure_list(field("actionable_improvements"), FALLBACK_ACTIONABLE),
        placement_focus: ensure_list(field("placement_focus"), FALLBACK_FOCUS),
    };

    PlacementFeedback {
        standout_strengths,
        top_improvements,
        lags: coaching.current_gaps.clone(),
        focus_areas: coaching.placement_focus.clone(),
        placement_coaching: coaching,
    }
}

/// Prompt for the placement-coaching review of one answer.
pub fn build_placement_prompt(transcript: &str) -> String {
    format!(
        "You are a senior placement officer reviewing a mock interview response.\n\
        \n\
        You must evaluate the candidate STRICTLY based on:\n\
        - The interview transcript provided below\n\
        - Evidence explicitly present in the transcript\n\
        \n\
        You have NO access to the candidate's resume, background, or intent beyond\n\
        what is stated in the transcript.\n\
        \n\
        YOUR RESPONSIBILITIES:\n\
        1. Identify concrete strengths demonstrated in the response.\n\
        2. Identify placement-relevant weaknesses or gaps visible in the response.\n\
        3. Provide focused coaching advice to improve placement readiness.\n\
        \n\
        EVALUATION RULES:\n\
        - Base every point directly on the transcript.\n\
        - Do NOT invent skills, experience, or achievements.\n\
        - Do NOT add tools, technologies, or concepts not mentioned.\n\
        - Avoid generic advice (e.g., \"practice more\", \"be confident\").\n\
        - If evidence is limited, infer conservatively from what is missing.\n\
        \n\
        MANDATORY OUTPUT REQUIREMENTS:\n\
        - standout_strengths: 3-4 items\n\
        - top_improvements: 3-4 items\n\
        - placement_coaching.current_gaps: at least 2 items\n\
        - placement_coaching.actionable_improvements: at least 2 items\n\
        - placement_coaching.placement_focus: at least 2 items\n\
        - All values MUST be arrays of strings\n\
        \n\
        {JSON_ONLY_CONTRACT}\n\
        \n\
        Interview Transcript:\n\
        {transcript}\n\
        \n\
        JSON FORMAT (FOLLOW EXACTLY):\n\
        \n\
        {{\n\
        \x20 \"standout_strengths\": [\"...\"],\n\
        \x20 \"top_improvements\": [\"...\"],\n\
        \x20 \"placement_coaching\": {{\n\
        \x20   \"current_gaps\": [\"...\"],\n\
        \x20   \"actionable_improvements\": [\"...\"],\n\
        \x20   \"placement_focus\": [\"...\"]\n\
        \x20 }}\n\
        }}\n\
        \n\
        Return only valid JSON."
    )
}
