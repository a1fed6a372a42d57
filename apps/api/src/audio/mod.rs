//! Audio-side collaborators: transcription, pitch analysis, sentiment.
//!
//! The evaluation core never performs signal processing itself — it
//! consumes these contracts. Each trait has an HTTP-backed
//! implementation pointed at a sidecar service; tests substitute fixed
//! implementations. Held in `AppState` as `Arc<dyn ...>` so the core
//! stays free of process-wide singletons.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::transcription::{PitchProfile, SentimentObservation, TranscriptionResult};

/// Sentiment classifiers choke on long inputs; sample this many chars.
const SENTIMENT_SAMPLE_CHARS: usize = 512;

#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, AppError>;
}

#[async_trait]
pub trait PitchAnalyzer: Send + Sync {
    async fn analyze_pitch(&self, audio_path: &Path) -> Result<PitchProfile, AppError>;
}

/// Optional collaborator: `None` from `classify` is a valid
/// "no adjustment" state, and a deployment without a sentiment service
/// simply always returns it.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Option<SentimentObservation>, AppError>;
}

/// Head + middle + tail sample of a long transcript, bounded to
/// `max_chars`. Short texts pass through untouched.
pub fn sample_text_for_sentiment(text: &str, max_chars: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }
    let part = max_chars / 3;
    let mid = chars.len() / 2;

    let mut out = String::with_capacity(max_chars);
    out.extend(&chars[..part]);
    out.extend(&chars[mid - part / 2..mid + part / 2]);
    out.extend(&chars[chars.len() - part..]);
    out
}

fn audio_err(context: &str, e: impl std::fmt::Display) -> AppError {
    AppError::Audio(format!("{context}: {e}"))
}

/// Speech-to-text over HTTP (whisper.cpp server and faster-whisper's
/// HTTP frontend both expose this shape).
pub struct HttpTranscriber {
    client: Client,
    transcribe_url: String,
}

impl HttpTranscriber {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            transcribe_url: format!("{}/transcribe", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<TranscriptionResult, AppError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| audio_err("reading staged audio", e))?;

        let file_name = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.wav".to_string());

        let form = reqwest::multipart::Form::new()
            .part("audio", reqwest::multipart::Part::bytes(bytes).file_name(file_name));

        let response = self
            .client
            .post(&self.transcribe_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| audio_err("transcription request", e))?
            .error_for_status()
            .map_err(|e| audio_err("transcription service", e))?;

        response
            .json::<TranscriptionResult>()
            .await
            .map_err(|e| audio_err("decoding transcription response", e))
    }
}

/// Pitch dynamics over HTTP.
pub struct HttpPitchAnalyzer {
    client: Client,
    analyze_url: String,
}

impl HttpPitchAnalyzer {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            analyze_url: format!("{}/pitch", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl PitchAnalyzer for HttpPitchAnalyzer {
    async fn analyze_pitch(&self, audio_path: &Path) -> Result<PitchProfile, AppError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| audio_err("reading staged audio", e))?;

        let form = reqwest::multipart::Form::new()
            .part("audio", reqwest::multipart::Part::bytes(bytes).file_name("audio.wav"));

        let response = self
            .client
            .post(&self.analyze_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| audio_err("pitch analysis request", e))?
            .error_for_status()
            .map_err(|e| audio_err("pitch analysis service", e))?;

        response
            .json::<PitchProfile>()
            .await
            .map_err(|e| audio_err("decoding pitch response", e))
    }
}

#[derive(Serialize)]
struct SentimentRequest<'a> {
    text: &'a str,
}

/// Sentiment classification over HTTP. The service returns a list of
/// observations (classifier pipelines batch); only the first is used.
pub struct HttpSentimentClassifier {
    client: Client,
    classify_url: String,
}

impl HttpSentimentClassifier {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            classify_url: format!("{}/sentiment", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HttpSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Option<SentimentObservation>, AppError> {
        let sampled = sample_text_for_sentiment(text, SENTIMENT_SAMPLE_CHARS);

        let response = self
            .client
            .post(&self.classify_url)
            .json(&SentimentRequest { text: &sampled })
            .send()
            .await
            .map_err(|e| audio_err("sentiment request", e))?
            .error_for_status()
            .map_err(|e| audio_err("sentiment service", e))?;

        let observations: Vec<SentimentObservation> = response
            .json()
            .await
            .map_err(|e| audio_err("decoding sentiment response", e))?;

        Ok(observations.into_iter().next())
    }
}

/// Stand-in used when no sentiment endpoint is configured.
pub struct NoSentiment;

#[async_trait]
impl SentimentClassifier for NoSentiment {
    async fn classify(&self, _text: &str) -> Result<Option<SentimentObservation>, AppError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_passes_through_unchanged() {
        let text = "a short transcript";
        assert_eq!(sample_text_for_sentiment(text, 512), text);
    }

    #[test]
    fn test_long_text_sampled_within_bound() {
        let text = "abcdefghij".repeat(200); // 2000 chars
        let sampled = sample_text_for_sentiment(&text, 512);
        assert!(sampled.chars().count() <= 512);
        // Keeps the head and the tail.
        assert!(sampled.starts_with("abcdefghij"));
        assert!(sampled.ends_with("abcdefghij"));
    }

    #[test]
    fn test_sample_exact_boundary() {
        let text = "x".repeat(512);
        assert_eq!(sample_text_for_sentiment(&text, 512).len(), 512);
    }

    #[tokio::test]
    async fn test_no_sentiment_always_returns_none() {
        let observation = NoSentiment.classify("great answer").await.unwrap();
        assert!(observation.is_none());
    }
}
