//! Evaluation core — the deterministic boundary between unreliable
//! collaborator output and the stable, bounded report the API returns.

pub mod placement;
pub mod tcs;

use serde_json::Value;

use crate::errors::AppError;
use crate::models::evaluation::{FinalEvaluationReport, SpeechSignals};
use crate::models::transcription::{PitchProfile, SentimentObservation};
use crate::scoring::{aggregation, cs_engine};

/// Evaluates one recorded answer end to end, from already-gathered
/// collaborator outputs. Pure: no I/O, no retries, reproducible for a
/// fixed input. Score-bearing failures propagate; coaching text falls
/// back deterministically inside the normalizers.
#[allow(clippy::too_many_arguments)]
pub fn evaluate(
    transcript: &str,
    duration_seconds: f64,
    signals: &SpeechSignals,
    pitch: &PitchProfile,
    sentiment: Option<&SentimentObservation>,
    technical_raw: &Value,
    placement_raw: &Value,
) -> Result<FinalEvaluationReport, AppError> {
    let cs = cs_engine::calculate_score(transcript, duration_seconds, signals, pitch, sentiment);
    let tcs = tcs::normalize_technical(technical_raw)?;
    let final_score = aggregation::combine_scores(cs.total_score, &tcs);
    let placement = placement::normalize_placement(placement_raw);

    Ok(FinalEvaluationReport {
        transcript: transcript.to_string(),
        cs_score: cs.total_score,
        cs_metrics: cs.metrics,
        cs_feedback: cs.feedback,
        tcs_score: tcs.score,
        tcs_band: tcs.band,
        tcs_verdict: tcs.verdict,
        tcs_issues: tcs.issues,
        tcs_improvements: tcs.improvement_points,
        final_score,
        placement_feedback: placement,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_evaluate_produces_bounded_report() {
        let technical = json!({"score": 88, "verdict": "Solid answer.", "issues": ["minor gap"], "improvement_points": ["tighten the intro"]});
        let placement = json!({"standout_strengths": ["clear narrative"]});
        let transcript = vec!["word"; 130].join(" ");

        let report = evaluate(
            &transcript,
            60.0,
            &SpeechSignals::default(),
            &PitchProfile::default(),
            None,
            &technical,
            &placement,
        )
        .unwrap();

        assert_eq!(report.cs_score, 95.0);
        assert_eq!(report.tcs_score, 88);
        // 0.6*95 + 0.4*88 = 92.2, Excellent band, <= max(95, 88)
        assert_eq!(report.final_score, 92.2);
        assert_eq!(
            report.placement_feedback.standout_strengths,
            vec!["clear narrative".to_string()]
        );
        assert!(!report.placement_feedback.lags.is_empty());
    }

    #[test]
    fn test_missing_technical_score_fails_whole_evaluation() {
        let technical = json!({"verdict": "looks fine"});
        let placement = json!({});
        let result = evaluate(
            "a short answer",
            30.0,
            &SpeechSignals::default(),
            &PitchProfile::default(),
            None,
            &technical,
            &placement,
        );
        assert!(matches!(result, Err(AppError::MissingField("score"))));
    }
}
