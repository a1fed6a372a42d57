use std::sync::Arc;

use crate::audio::{PitchAnalyzer, SentimentClassifier, Transcriber};
use crate::config::Config;
use crate::llm_client::CompletionModel;
use crate::nlp::LinguisticAnalyzer;
use crate::store::SessionStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every collaborator is an explicitly constructed, injected
/// instance — the evaluation core holds no hidden singletons.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionModel>,
    pub transcriber: Arc<dyn Transcriber>,
    pub pitch: Arc<dyn PitchAnalyzer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    /// Optional richer linguistic analysis; absent means signal
    /// extraction runs in degraded substring mode.
    pub analyzer: Option<Arc<dyn LinguisticAnalyzer>>,
    pub sessions: Arc<SessionStore>,
    pub config: Config,
}
