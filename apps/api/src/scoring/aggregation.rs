//! Final score aggregation.
//!
//! Blends the communication score with the technical score, then applies
//! ceilings in a fixed order: the band ceiling first, the
//! better-of-the-two-inputs ceiling second. Either may be the binding
//! constraint, so the order matters.

use crate::models::evaluation::{Band, TechnicalEvaluationResult};
use crate::scoring::cs_engine::MAX_SCORE;

fn round_to_1dp(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Combines a communication score in [0, 95] with a technical result
/// into one final score, rounded to one decimal.
pub fn combine_scores(cs_score: f64, tcs: &TechnicalEvaluationResult) -> f64 {
    let mut final_score = 0.6 * cs_score + 0.4 * tcs.score as f64;

    final_score = match tcs.band {
        Band::Poor => final_score.min(45.0),
        Band::Weak => final_score.min(60.0),
        Band::Partial => final_score.min(82.0),
        Band::Good | Band::Excellent => final_score,
    };

    // The final score can never exceed the better of its two inputs.
    final_score = final_score.min(cs_score.max(tcs.score as f64));
    final_score = final_score.clamp(0.0, MAX_SCORE);

    round_to_1dp(final_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::tcs::bucket;

    fn tcs(score: i64) -> TechnicalEvaluationResult {
        TechnicalEvaluationResult {
            score,
            band: bucket(score),
            verdict: String::new(),
            issues: vec!["none".to_string()],
            improvement_points: vec!["none".to_string()],
        }
    }

    #[test]
    fn test_plain_blend_without_ceilings() {
        // 0.6*80 + 0.4*90 = 84; Excellent band, no ceiling; 84 <= max(80, 90).
        assert_eq!(combine_scores(80.0, &tcs(90)), 84.0);
    }

    #[test]
    fn test_poor_band_ceiling_binds() {
        // Raw blend is 62; the Poor ceiling caps it at 45.
        assert_eq!(combine_scores(90.0, &tcs(20)), 45.0);
    }

    #[test]
    fn test_weak_band_ceiling() {
        // 0.6*95 + 0.4*40 = 73; Weak caps at 60.
        assert_eq!(combine_scores(95.0, &tcs(40)), 60.0);
    }

    #[test]
    fn test_partial_band_ceiling() {
        // 0.6*95 + 0.4*70 = 85; Partial caps at 82.
        assert_eq!(combine_scores(95.0, &tcs(70)), 82.0);
    }

    #[test]
    fn test_max_of_inputs_ceiling_binds_after_band() {
        // 0.6*50 + 0.4*80 = 62; Good band has no ceiling, but
        // max(50, 80) = 80 leaves 62 untouched — so push further:
        // cs=20, tcs=30 (Poor): blend 24, Poor cap 45 no-op, max cap 30 no-op.
        assert_eq!(combine_scores(20.0, &tcs(30)), 24.0);
        // cs=95, tcs=90 (Excellent): blend 93, bounded by max input 95.
        assert_eq!(combine_scores(95.0, &tcs(90)), 93.0);
    }

    #[test]
    fn test_final_never_exceeds_better_input() {
        for cs in [0.0_f64, 30.0, 60.0, 95.0] {
            for t in [0_i64, 34, 35, 60, 75, 85, 100] {
                let result = combine_scores(cs, &tcs(t));
                assert!(result <= cs.max(t as f64) + 1e-9);
                assert!((0.0..=95.0).contains(&result));
            }
        }
    }

    #[test]
    fn test_result_rounded_to_one_decimal() {
        // 0.6*80.55 + 0.4*80 = 80.33 → 80.3
        let result = combine_scores(80.55, &tcs(80));
        assert_eq!(result, 80.3);
    }
}
