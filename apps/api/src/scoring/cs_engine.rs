//! Communication score engine.
//!
//! Deterministic scorer over linguistic signals, pacing, pitch
//! variability and sentiment. The step order below is fixed: feedback
//! strings append in the order their step fires, and tests compare
//! against that order. Duration is normalized to a per-minute basis
//! with a one-minute floor so very short answers cannot blow up rates.

use std::collections::BTreeMap;

use crate::models::evaluation::{CommunicationScore, SpeechSignals};
use crate::models::transcription::{PitchProfile, SentimentLabel, SentimentObservation};

/// Upper bound for communication scores. 95 rather than 100 keeps a
/// visible margin for answers the rubric cannot distinguish.
pub const MAX_SCORE: f64 = 95.0;

/// Hard ceiling applied when hedging exceeds two per minute.
const HEAVY_HEDGING_CEILING: f64 = 78.0;

pub fn calculate_score(
    transcript: &str,
    duration_seconds: f64,
    signals: &SpeechSignals,
    pitch: &PitchProfile,
    sentiment: Option<&SentimentObservation>,
) -> CommunicationScore {
    let mut score = 100.0_f64;
    let mut feedback: Vec<String> = Vec::new();
    let duration_min = (duration_seconds / 60.0).max(1.0);

    // 1. Confidence (hedging)
    let hedges_per_min = f64::from(signals.hedge_count) / duration_min;
    if hedges_per_min > 1.0 {
        score -= ((hedges_per_min - 1.0) * 4.0).min(22.0);
        feedback.push(format!(
            "Hedging detected ({hedges_per_min:.1}/min). Be more decisive."
        ));
    }

    if signals.apology_count > 0 {
        score -= f64::from(signals.apology_count) * 4.0;
        feedback.push("Avoid apologizing or underselling yourself.".to_string());
    }

    // 2. Ownership vs passive voice
    let own_rate = f64::from(signals.own_count) / duration_min;
    let passive_rate = f64::from(signals.passive_count) / duration_min;

    if own_rate > passive_rate + 0.5 {
        score += ((own_rate - passive_rate) * 2.0).min(8.0);
        feedback.push("Good ownership language detected.".to_string());
    } else if passive_rate > own_rate + 1.0 {
        score -= 5.0;
        feedback.push("Excessive passive voice. Use active language.".to_string());
    }

    // 3. Delivery
    let fillers_per_min = f64::from(signals.filler_count) / duration_min;
    if fillers_per_min > 3.0 {
        score -= ((fillers_per_min - 3.0) * 2.0).min(15.0);
        feedback.push(format!("High filler usage ({fillers_per_min:.1}/min)."));
    }

    let pauses_per_min = f64::from(signals.long_pauses) / duration_min;
    if pauses_per_min > 2.0 {
        score -= ((pauses_per_min - 2.0) * 1.5).min(8.0);
        feedback.push("Frequent long pauses detected.".to_string());
    }

    let word_count = transcript.split_whitespace().count();
    let wpm = if duration_seconds > 0.0 {
        word_count as f64 / duration_seconds * 60.0
    } else {
        0.0
    };
    // Fast pace is penalized twice as steeply per WPM as slow pace.
    if wpm < 115.0 {
        score -= ((115.0 - wpm) * 0.2).min(10.0);
        feedback.push(format!("Pace is slow ({wpm:.0} WPM)."));
    } else if wpm > 155.0 {
        score -= ((wpm - 155.0) * 0.4).min(15.0);
        feedback.push(format!("Pace is fast ({wpm:.0} WPM). Slow down."));
    }

    if signals.long_speech_blocks > 0 {
        score -= (f64::from(signals.long_speech_blocks) * 4.0).min(10.0);
        feedback.push("Break long explanations with pauses.".to_string());
    }

    // 4. Voice modulation
    if pitch.monotone_score > 0.6 {
        score -= pitch.monotone_score * 8.0;
        feedback.push("Voice sounds monotone. Add variation.".to_string());
    }

    // 5. Sentiment — additive polish only, never a primary signal
    if let Some(obs) = sentiment {
        match obs.label {
            SentimentLabel::Positive if obs.confidence > 0.9 => {
                score += 1.5;
                feedback.push("Positive tone.".to_string());
            }
            SentimentLabel::Negative if obs.confidence > 0.9 => {
                score -= 5.0;
                feedback.push("Tone sounds uncertain.".to_string());
            }
            _ => {}
        }
    }

    // 6. Confidence ceiling — a hard cap, not an additive penalty
    if hedges_per_min > 2.0 {
        score = score.min(HEAVY_HEDGING_CEILING);
    }

    score = score.clamp(0.0, MAX_SCORE);

    let mut metrics = BTreeMap::new();
    metrics.insert("filler_count".to_string(), f64::from(signals.filler_count));
    metrics.insert("hedge_count".to_string(), f64::from(signals.hedge_count));
    metrics.insert("own_count".to_string(), f64::from(signals.own_count));
    metrics.insert(
        "passive_count".to_string(),
        f64::from(signals.passive_count),
    );
    metrics.insert(
        "apology_count".to_string(),
        f64::from(signals.apology_count),
    );
    metrics.insert("long_pauses".to_string(), f64::from(signals.long_pauses));
    metrics.insert(
        "long_speech_blocks".to_string(),
        f64::from(signals.long_speech_blocks),
    );
    metrics.insert("wpm".to_string(), wpm);
    metrics.insert("fillers_per_min".to_string(), fillers_per_min);
    metrics.insert("monotone_score".to_string(), pitch.monotone_score);

    CommunicationScore {
        total_score: score,
        metrics,
        feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_pitch() -> PitchProfile {
        PitchProfile {
            monotone_score: 0.0,
            std_semitones: 3.0,
            voiced_ratio: 0.8,
        }
    }

    fn transcript_with_words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_clean_answer_scores_ceiling_with_no_feedback() {
        // 130 words over 60s = 130 WPM, all signals zero, varied pitch.
        let transcript = transcript_with_words(130);
        let result = calculate_score(
            &transcript,
            60.0,
            &SpeechSignals::default(),
            &flat_pitch(),
            None,
        );
        assert_eq!(result.total_score, 95.0);
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_score_is_bounded_under_extreme_signals() {
        let signals = SpeechSignals {
            filler_count: 100,
            hedge_count: 100,
            own_count: 0,
            passive_count: 50,
            apology_count: 20,
            long_pauses: 40,
            long_speech_blocks: 10,
        };
        let pitch = PitchProfile {
            monotone_score: 1.0,
            std_semitones: 0.1,
            voiced_ratio: 0.9,
        };
        let negative = SentimentObservation {
            label: SentimentLabel::Negative,
            confidence: 0.99,
        };
        let result = calculate_score("uh", 30.0, &signals, &pitch, Some(&negative));
        assert!(result.total_score >= 0.0);
        assert!(result.total_score <= 95.0);
    }

    #[test]
    fn test_heavy_hedging_triggers_ceiling() {
        // 3 hedges/min with everything else clean: additive penalty alone
        // would leave ~92, the ceiling forces 78.
        let signals = SpeechSignals {
            hedge_count: 3,
            ..SpeechSignals::default()
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(&transcript, 60.0, &signals, &flat_pitch(), None);
        assert_eq!(result.total_score, 78.0);
    }

    #[test]
    fn test_hedging_feedback_includes_rate() {
        let signals = SpeechSignals {
            hedge_count: 2,
            ..SpeechSignals::default()
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(&transcript, 60.0, &signals, &flat_pitch(), None);
        assert_eq!(
            result.feedback,
            vec!["Hedging detected (2.0/min). Be more decisive.".to_string()]
        );
    }

    #[test]
    fn test_feedback_order_follows_step_order() {
        let signals = SpeechSignals {
            filler_count: 8,
            hedge_count: 2,
            apology_count: 1,
            long_speech_blocks: 1,
            ..SpeechSignals::default()
        };
        let pitch = PitchProfile {
            monotone_score: 0.9,
            std_semitones: 0.2,
            voiced_ratio: 0.7,
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(&transcript, 60.0, &signals, &pitch, None);
        assert_eq!(
            result.feedback,
            vec![
                "Hedging detected (2.0/min). Be more decisive.".to_string(),
                "Avoid apologizing or underselling yourself.".to_string(),
                "High filler usage (8.0/min).".to_string(),
                "Break long explanations with pauses.".to_string(),
                "Voice sounds monotone. Add variation.".to_string(),
            ]
        );
    }

    #[test]
    fn test_ownership_bonus_capped() {
        let signals = SpeechSignals {
            own_count: 20,
            ..SpeechSignals::default()
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(&transcript, 60.0, &signals, &flat_pitch(), None);
        // 100 + min(40, 8) clamps at 95 anyway; feedback confirms the branch.
        assert_eq!(result.total_score, 95.0);
        assert_eq!(result.feedback, vec!["Good ownership language detected.".to_string()]);
    }

    #[test]
    fn test_passive_voice_penalty() {
        let signals = SpeechSignals {
            passive_count: 2,
            ..SpeechSignals::default()
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(&transcript, 60.0, &signals, &flat_pitch(), None);
        assert_eq!(result.total_score, 95.0); // 100 - 5, clamp is a no-op
        assert_eq!(
            result.feedback,
            vec!["Excessive passive voice. Use active language.".to_string()]
        );
    }

    #[test]
    fn test_fast_pace_penalized_steeper_than_slow() {
        // 20 WPM over the fast bound vs 20 under the slow bound.
        let fast = calculate_score(
            &transcript_with_words(175),
            60.0,
            &SpeechSignals::default(),
            &flat_pitch(),
            None,
        );
        let slow = calculate_score(
            &transcript_with_words(95),
            60.0,
            &SpeechSignals::default(),
            &flat_pitch(),
            None,
        );
        // fast: 100 - 8 = 92; slow: 100 - 4 = 95 (clamped from 96)
        assert_eq!(fast.total_score, 92.0);
        assert_eq!(slow.total_score, 95.0);
        assert!(fast.feedback[0].contains("fast"));
        assert!(slow.feedback[0].contains("slow"));
    }

    #[test]
    fn test_zero_duration_reports_zero_wpm() {
        let result = calculate_score(
            "some words here",
            0.0,
            &SpeechSignals::default(),
            &flat_pitch(),
            None,
        );
        assert_eq!(result.metrics["wpm"], 0.0);
        // 0 WPM is "slow": 100 - min(23, 10) = 90.
        assert_eq!(result.total_score, 90.0);
    }

    #[test]
    fn test_low_confidence_sentiment_ignored() {
        let weak_positive = SentimentObservation {
            label: SentimentLabel::Positive,
            confidence: 0.5,
        };
        let transcript = transcript_with_words(130);
        let result = calculate_score(
            &transcript,
            60.0,
            &SpeechSignals::default(),
            &flat_pitch(),
            Some(&weak_positive),
        );
        assert!(result.feedback.is_empty());
    }

    #[test]
    fn test_short_answer_uses_one_minute_floor() {
        // 10 hedges in 6 seconds would be 100/min without the floor;
        // with it the rate is 10/min and the penalty caps at 22.
        let signals = SpeechSignals {
            hedge_count: 10,
            ..SpeechSignals::default()
        };
        let result = calculate_score(&transcript_with_words(13), 6.0, &signals, &flat_pitch(), None);
        assert!(result.feedback[0].starts_with("Hedging detected (10.0/min)"));
        assert_eq!(result.metrics["hedge_count"], 10.0);
    }

    #[test]
    fn test_metrics_include_raw_counts_and_derived_rates() {
        let signals = SpeechSignals {
            filler_count: 4,
            hedge_count: 1,
            long_pauses: 2,
            ..SpeechSignals::default()
        };
        let result = calculate_score(
            &transcript_with_words(120),
            60.0,
            &signals,
            &flat_pitch(),
            None,
        );
        assert_eq!(result.metrics["filler_count"], 4.0);
        assert_eq!(result.metrics["long_pauses"], 2.0);
        assert_eq!(result.metrics["fillers_per_min"], 4.0);
        assert_eq!(result.metrics["wpm"], 120.0);
        assert_eq!(result.metrics["monotone_score"], 0.0);
    }
}
