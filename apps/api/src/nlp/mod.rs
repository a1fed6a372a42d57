//! Linguistic analysis seam.
//!
//! Signal extraction works from substring scans alone, but a richer
//! analyzer (POS tags, dependency parses) sharpens filler, hedge,
//! ownership and passive-voice detection. The analyzer is injected by
//! the orchestrating layer — never a process-wide singleton — and its
//! absence or failure degrades extraction, never aborts it.

pub mod signals;

/// Token-level cue counts from a linguistic analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCueCounts {
    /// Simple filler tokens plus interjection-tagged "like".
    pub fillers: u32,
    /// Hedge keywords plus "think" governed by a first-person subject.
    pub hedges: u32,
    /// Ownership verbs ("build", "design", "lead", ...) whose clause
    /// contains a first-person subject.
    pub ownership: u32,
    /// Auxiliary-passive constructions without a first-person subject.
    pub passive: u32,
}

/// Optional richer analysis over a transcript. Implementations may fail
/// (model not loaded, subprocess gone); callers treat failure as
/// "analyzer unavailable" and fall back to substring counting.
pub trait LinguisticAnalyzer: Send + Sync {
    fn token_cues(&self, transcript: &str) -> anyhow::Result<TokenCueCounts>;
}
