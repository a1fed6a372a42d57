//! Signal extraction — turns a transcript plus word/segment timing into
//! counts of rhetorical and delivery cues. Pure function of its input;
//! never fails.

use tracing::warn;

use crate::models::evaluation::SpeechSignals;
use crate::models::transcription::TimedSegment;
use crate::nlp::LinguisticAnalyzer;

const FILLERS_SIMPLE: &[&str] = &["um", "uh", "umm", "uhh"];
const MULTI_FILLERS: &[&str] = &["you know", "i mean"];

const HEDGE_PHRASES: &[&str] = &[
    "i think",
    "not sure",
    "kind of",
    "sort of",
    "i guess",
    "might be",
    "i don't remember",
];

const UNCERTAINTY_PATTERNS: &[&str] = &[
    "or maybe",
    "not sure if",
    "i think it was",
    "can't remember",
];

const APOLOGIES: &[&str] = &["sorry", "apologize", "i forgot", "i didn't prepare", "excuse me"];

/// Gap between one word's end and the next word's start that counts as
/// a long pause.
const LONG_PAUSE_GAP_SECS: f64 = 1.2;
/// Segment duration beyond which a segment counts as a long speech block.
const LONG_BLOCK_SECS: f64 = 10.0;

fn substring_count(haystack: &str, needle: &str) -> u32 {
    haystack.matches(needle).count() as u32
}

/// Extracts delivery and rhetoric signals from a transcript.
///
/// With an analyzer, filler/hedge/ownership/passive counts come from
/// token-level cues plus phrase scans. Without one (or when it fails),
/// fillers and hedges fall back to pure substring counting and
/// ownership/passive stay at zero. Apologies, pauses, long blocks and
/// uncertainty patterns are computed the same way in both modes.
pub fn detect_signals(
    transcript: &str,
    segments: &[TimedSegment],
    analyzer: Option<&dyn LinguisticAnalyzer>,
) -> SpeechSignals {
    let text_lower = transcript.to_lowercase();

    let mut filler_count = 0u32;
    let mut hedge_count = 0u32;
    let mut own_count = 0u32;
    let mut passive_count = 0u32;

    let cues = analyzer.and_then(|a| match a.token_cues(transcript) {
        Ok(cues) => Some(cues),
        Err(e) => {
            warn!("Linguistic analyzer failed, degrading to substring scan: {e}");
            None
        }
    });

    match cues {
        Some(cues) => {
            filler_count += cues.fillers;
            hedge_count += cues.hedges;
            own_count = cues.ownership;
            passive_count = cues.passive;

            for f in MULTI_FILLERS {
                filler_count += substring_count(&text_lower, f);
            }
            for h in HEDGE_PHRASES {
                hedge_count += substring_count(&text_lower, h);
            }
        }
        None => {
            for f in FILLERS_SIMPLE {
                filler_count += substring_count(&text_lower, f);
            }
            for f in MULTI_FILLERS {
                filler_count += substring_count(&text_lower, f);
            }
            for h in HEDGE_PHRASES {
                hedge_count += substring_count(&text_lower, h);
            }
        }
    }

    for p in UNCERTAINTY_PATTERNS {
        hedge_count += substring_count(&text_lower, p);
    }

    let apology_count = APOLOGIES
        .iter()
        .map(|a| substring_count(&text_lower, a))
        .sum();

    // Pauses are measured across segment boundaries, so flatten first.
    let all_words: Vec<_> = segments.iter().flat_map(|s| s.words.iter()).collect();
    let long_pauses = all_words
        .windows(2)
        .filter(|pair| pair[1].start - pair[0].end > LONG_PAUSE_GAP_SECS)
        .count() as u32;

    let long_speech_blocks = segments
        .iter()
        .filter(|s| s.end - s.start > LONG_BLOCK_SECS)
        .count() as u32;

    SpeechSignals {
        filler_count,
        hedge_count,
        own_count,
        passive_count,
        apology_count,
        long_pauses,
        long_speech_blocks,
    }
}
