use serde::{Deserialize, Serialize};

/// A single word with its absolute start/end time in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedWord {
    pub start: f64,
    pub end: f64,
    pub word: String,
}

/// A contiguous speech segment as reported by the transcriber.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<TimedWord>,
}

/// Full transcription of one recorded answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<TimedSegment>,
    #[serde(default)]
    pub language: String,
    pub duration_seconds: f64,
}

/// Pitch variability profile from the pitch collaborator.
/// Only `monotone_score` feeds the communication scorer; the other
/// fields are part of the collaborator contract and surface in logs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchProfile {
    /// 1.0 = fully monotone, 0.0 = highly varied.
    pub monotone_score: f64,
    pub std_semitones: f64,
    pub voiced_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "POSITIVE")]
    Positive,
    #[serde(rename = "NEGATIVE")]
    Negative,
    /// Any label the classifier emits outside the two we act on.
    #[serde(other)]
    Other,
}

/// Sentiment classification of the transcript. Absence of a whole
/// observation is a valid state and applies no score adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentObservation {
    pub label: SentimentLabel,
    pub confidence: f64,
}
