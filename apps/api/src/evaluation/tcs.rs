//! Technical evaluation — prompt construction and normalization of the
//! model's recovered JSON into a bounded `TechnicalEvaluationResult`.

use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_CONTRACT;
use crate::models::evaluation::{Band, TechnicalEvaluationResult};

pub const TCS_MAX_NEW_TOKENS: u32 = 1600;

const DEFAULT_ISSUE: &str = "No major technical issues identified.";
const DEFAULT_IMPROVEMENT: &str =
    "Improve clarity and specificity while explaining technical decisions.";

/// Maps a technical score to its discrete band. The ONLY place a band
/// is ever assigned — model-supplied band fields are ignored.
pub fn bucket(score: i64) -> Band {
    if score >= 85 {
        Band::Excellent
    } else if score >= 75 {
        Band::Good
    } else if score >= 60 {
        Band::Partial
    } else if score >= 35 {
        Band::Weak
    } else {
        Band::Poor
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    if items.is_empty() {
        return None;
    }
    let strings: Vec<String> = items
        .iter()
        .filter_map(|v| v.as_str())
        .map(|s| s.to_string())
        .collect();
    (!strings.is_empty()).then_some(strings)
}

/// Validates and normalizes a recovered technical-evaluation object.
///
/// `score` is required and never defaulted — fabricating it would
/// corrupt the aggregation invariants downstream. Coaching lists get
/// deterministic fallbacks instead.
pub fn normalize_technical(raw: &Value) -> Result<TechnicalEvaluationResult, AppError> {
    let score_value = raw.get("score").ok_or(AppError::MissingField("score"))?;
    let score = score_value
        .as_i64()
        .or_else(|| score_value.as_f64().map(|f| f as i64))
        .ok_or_else(|| AppError::MalformedField("'score' is not a number".to_string()))?
        .clamp(0, 100);

    let verdict = raw
        .get("verdict")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    let issues =
        string_list(raw.get("issues")).unwrap_or_else(|| vec![DEFAULT_ISSUE.to_string()]);
    let improvement_points = string_list(raw.get("improvement_points"))
        .unwrap_or_else(|| vec![DEFAULT_IMPROVEMENT.to_string()]);

    Ok(TechnicalEvaluationResult {
        score,
        band: bucket(score),
        verdict,
        issues,
        improvement_points,
    })
}

/// Prompt for the technical-correctness evaluation of one answer.
pub fn build_tcs_prompt(question: &str, transcript: &str) -> String {
    format!(
        "You are a senior technical interviewer conducting a mock interview.\n\
        \n\
        You must evaluate the candidate STRICTLY based on:\n\
        1. The interview question provided\n\
        2. The candidate's answer provided below\n\
        \n\
        Interview Question:\n\
        {question}\n\
        \n\
        Candidate Answer:\n\
        {transcript}\n\
        \n\
        STRICT EVALUATION RULES:\n\
        - Judge relevance to the question.\n\
        - Judge technical correctness ONLY within scope.\n\
        - Do NOT infer unstated knowledge.\n\
        - Do NOT introduce new tools or concepts.\n\
        - Avoid generic interview advice.\n\
        \n\
        SCORING GUIDELINES:\n\
        - Score from 0 to 100.\n\
        \n\
        COACHING REQUIREMENTS:\n\
        - Provide at least 5 improvement points.\n\
        - Each point must reference the answer or something missing.\n\
        \n\
        {JSON_ONLY_CONTRACT}\n\
        \n\
        JSON FORMAT:\n\
        {{\n\
        \x20 \"score\": <int>,\n\
        \x20 \"verdict\": \"<1-2 sentence technical judgment>\",\n\
        \x20 \"issues\": [\"<question-relative technical issues>\"],\n\
        \x20 \"improvement_points\": [\"<specific coaching points>\"]\n\
        }}\n\
        \n\
        Return only valid JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bucket_boundaries_are_exact() {
        assert_eq!(bucket(85), Band::Excellent);
        assert_eq!(bucket(84), Band::Good);
        assert_eq!(bucket(75), Band::Good);
        assert_eq!(bucket(74), Band::Partial);
        assert_eq!(bucket(60), Band::Partial);
        assert_eq!(bucket(59), Band::Weak);
        assert_eq!(bucket(35), Band::Weak);
        assert_eq!(bucket(34), Band::Poor);
        assert_eq!(bucket(0), Band::Poor);
        assert_eq!(bucket(100), Band::Excellent);
    }

    #[test]
    fn test_missing_score_is_fatal() {
        let raw = json!({"verdict": "fine", "issues": ["x"]});
        assert!(matches!(
            normalize_technical(&raw),
            Err(AppError::MissingField("score"))
        ));
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        let raw = json!({"score": "eighty"});
        assert!(matches!(
            normalize_technical(&raw),
            Err(AppError::MalformedField(_))
        ));
    }

    #[test]
    fn test_fractional_score_truncates() {
        let raw = json!({"score": 72.9});
        assert_eq!(normalize_technical(&raw).unwrap().score, 72);
    }

    #[test]
    fn test_score_clamped_and_band_derived() {
        let raw = json!({"score": 250});
        let result = normalize_technical(&raw).unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.band, Band::Excellent);

        let raw = json!({"score": -10});
        let result = normalize_technical(&raw).unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.band, Band::Poor);
    }

    #[test]
    fn test_model_supplied_band_is_ignored() {
        let raw = json!({"score": 40, "band": "Excellent"});
        let result = normalize_technical(&raw).unwrap();
        assert_eq!(result.band, Band::Weak);
    }

    #[test]
    fn test_verdict_defaults_to_empty_and_is_trimmed() {
        let raw = json!({"score": 70});
        assert_eq!(normalize_technical(&raw).unwrap().verdict, "");

        let raw = json!({"score": 70, "verdict": "  solid  "});
        assert_eq!(normalize_technical(&raw).unwrap().verdict, "solid");
    }

    #[test]
    fn test_list_fallbacks() {
        // Absent, wrong-shaped, and empty lists all fall back wholesale.
        for issues in [json!({"score": 50}), json!({"score": 50, "issues": "oops"}), json!({"score": 50, "issues": []})] {
            let result = normalize_technical(&issues).unwrap();
            assert_eq!(result.issues, vec![DEFAULT_ISSUE.to_string()]);
            assert_eq!(
                result.improvement_points,
                vec![DEFAULT_IMPROVEMENT.to_string()]
            );
        }
    }

    #[test]
    fn test_present_lists_pass_through() {
        let raw = json!({
            "score": 77,
            "issues": ["missed edge case"],
            "improvement_points": ["mention complexity", "name the data structure"]
        });
        let result = normalize_technical(&raw).unwrap();
        assert_eq!(result.issues, vec!["missed edge case".to_string()]);
        assert_eq!(result.improvement_points.len(), 2);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!({"score": 66, "verdict": "ok", "issues": ["a"], "improvement_points": ["b"]});
        let once = normalize_technical(&raw).unwrap();
        let again = normalize_technical(&serde_json::to_value(&once).unwrap()).unwrap();
        assert_eq!(once.score, again.score);
        assert_eq!(once.band, again.band);
        assert_eq!(once.verdict, again.verdict);
        assert_eq!(once.issues, again.issues);
        assert_eq!(once.improvement_points, again.improvement_points);
    }

    #[test]
    fn test_prompt_carries_question_and_transcript() {
        let prompt = build_tcs_prompt("What is a B-tree?", "A B-tree is a balanced tree.");
        assert!(prompt.contains("What is a B-tree?"));
        assert!(prompt.contains("A B-tree is a balanced tree."));
        assert!(prompt.contains("Output ONLY one valid JSON object."));
    }
}
