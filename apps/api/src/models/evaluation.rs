use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-transcript counts of rhetorical/delivery cues.
/// Produced once by the signal extractor, immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechSignals {
    pub filler_count: u32,
    pub hedge_count: u32,
    pub own_count: u32,
    pub passive_count: u32,
    pub apology_count: u32,
    pub long_pauses: u32,
    pub long_speech_blocks: u32,
}

/// Communication score with its supporting metrics and feedback.
/// `feedback` is append-only; insertion order is evaluation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunicationScore {
    /// Bounded to [0, 95].
    pub total_score: f64,
    pub metrics: BTreeMap<String, f64>,
    pub feedback: Vec<String>,
}

/// Discrete technical quality band. Derived purely from the numeric
/// score via `evaluation::tcs::bucket` — never set independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Band {
    Excellent,
    Good,
    Partial,
    Weak,
    Poor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalEvaluationResult {
    /// Integer score clamped to [0, 100].
    pub score: i64,
    pub band: Band,
    pub verdict: String,
    /// Non-empty by construction.
    pub issues: Vec<String>,
    /// Non-empty by construction.
    pub improvement_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementCoaching {
    pub current_gaps: Vec<String>,
    pub actionable_improvements: Vec<String>,
    pub placement_focus: Vec<String>,
}

/// Placement coaching block. Every list is non-empty by construction;
/// `lags` mirrors `placement_coaching.current_gaps` and `focus_areas`
/// mirrors `placement_coaching.placement_focus` for consumers that read
/// them independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFeedback {
    pub standout_strengths: Vec<String>,
    pub top_improvements: Vec<String>,
    pub lags: Vec<String>,
    pub placement_coaching: PlacementCoaching,
    pub focus_areas: Vec<String>,
}

/// Everything the evaluation boundary returns for one answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalEvaluationReport {
    pub transcript: String,
    pub cs_score: f64,
    pub cs_metrics: BTreeMap<String, f64>,
    pub cs_feedback: Vec<String>,
    pub tcs_score: i64,
    pub tcs_band: Band,
    pub tcs_verdict: String,
    pub tcs_issues: Vec<String>,
    pub tcs_improvements: Vec<String>,
    /// Rounded to one decimal, bounded to [0, 95].
    pub final_score: f64,
    pub placement_feedback: PlacementFeedback,
}

/// Interview question input at the API boundary: a single question or a
/// list. Normalized to one canonical string before it reaches any
/// evaluation component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionInput {
    Single(String),
    Many(Vec<String>),
}

pub const DEFAULT_QUESTION: &str = "Explain your approach to this problem.";

impl QuestionInput {
    /// First non-blank question, trimmed; falls back to a neutral
    /// default so downstream prompts always have a question to cite.
    pub fn canonical(&self) -> String {
        let picked = match self {
            QuestionInput::Single(q) => {
                let q = q.trim();
                (!q.is_empty()).then(|| q.to_string())
            }
            QuestionInput::Many(qs) => qs
                .iter()
                .map(|q| q.trim())
                .find(|q| !q.is_empty())
                .map(|q| q.to_string()),
        };
        picked.unwrap_or_else(|| DEFAULT_QUESTION.to_string())
    }
}

impl Default for QuestionInput {
    fn default() -> Self {
        QuestionInput::Single(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_question_is_trimmed() {
        let q = QuestionInput::Single("  What is a mutex?  ".to_string());
        assert_eq!(q.canonical(), "What is a mutex?");
    }

    #[test]
    fn test_many_picks_first_non_blank() {
        let q = QuestionInput::Many(vec![
            "   ".to_string(),
            "Describe your project.".to_string(),
            "Second question".to_string(),
        ]);
        assert_eq!(q.canonical(), "Describe your project.");
    }

    #[test]
    fn test_blank_input_falls_back_to_default() {
        assert_eq!(
            QuestionInput::Single("".to_string()).canonical(),
            DEFAULT_QUESTION
        );
        assert_eq!(QuestionInput::Many(vec![]).canonical(), DEFAULT_QUESTION);
    }

    #[test]
    fn test_untagged_deserialization() {
        let single: QuestionInput = serde_json::from_str("\"One question\"").unwrap();
        assert_eq!(single.canonical(), "One question");

        let many: QuestionInput = serde_json::from_str("[\"A\", \"B\"]").unwrap();
        assert_eq!(many.canonical(), "A");
    }
}
