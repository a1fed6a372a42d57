//! Interview evaluation orchestration.
//!
//! Gathers collaborator outputs (transcription, pitch, sentiment, model
//! completions) and hands them to the pure evaluation core. All blocking
//! I/O lives here, behind the injected collaborator seams; the core
//! itself stays deterministic and testable.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::{self, placement, tcs};
use crate::llm_client::run_structured;
use crate::models::evaluation::{FinalEvaluationReport, QuestionInput, SpeechSignals};
use crate::models::transcription::{PitchProfile, SentimentObservation};
use crate::nlp::signals::detect_signals;
use crate::state::AppState;

/// Everything gathered from the audio-side collaborators for one answer.
pub struct CommunicationInputs {
    pub transcript: String,
    pub duration_seconds: f64,
    pub signals: SpeechSignals,
    pub pitch: PitchProfile,
    pub sentiment: Option<SentimentObservation>,
}

/// Transcribes and analyzes one staged audio file.
///
/// A blank transcription is fatal (`EmptyTranscription`). A sentiment
/// failure is not: sentiment is polish only, so it degrades to `None`
/// with a warning.
pub async fn gather_communication_inputs(
    state: &AppState,
    audio_path: &Path,
) -> Result<CommunicationInputs, AppError> {
    let pitch = state.pitch.analyze_pitch(audio_path).await?;
    let transcription = state.transcriber.transcribe(audio_path).await?;

    if transcription.text.trim().is_empty() {
        return Err(AppError::EmptyTranscription);
    }

    let signals = detect_signals(
        &transcription.text,
        &transcription.segments,
        state.analyzer.as_deref(),
    );

    let sentiment = match state.sentiment.classify(&transcription.text).await {
        Ok(observation) => observation,
        Err(e) => {
            warn!("Sentiment classification failed, continuing without: {e}");
            None
        }
    };

    Ok(CommunicationInputs {
        transcript: transcription.text,
        duration_seconds: transcription.duration_seconds,
        signals,
        pitch,
        sentiment,
    })
}

/// Full evaluation of one recorded answer: audio analysis, technical
/// evaluation, placement coaching, aggregation.
pub async fn evaluate_answer(
    state: &AppState,
    audio_path: &Path,
    question: &QuestionInput,
) -> Result<FinalEvaluationReport, AppError> {
    let inputs = gather_communication_inputs(state, audio_path).await?;
    let question = question.canonical();

    let technical_raw = run_structured(
        state.llm.as_ref(),
        &tcs::build_tcs_prompt(&question, &inputs.transcript),
        tcs::TCS_MAX_NEW_TOKENS,
    )
    .await?;

    let placement_raw = run_structured(
        state.llm.as_ref(),
        &placement::build_placement_prompt(&inputs.transcript),
        placement::PLACEMENT_MAX_NEW_TOKENS,
    )
    .await?;

    let report = evaluation::evaluate(
        &inputs.transcript,
        inputs.duration_seconds,
        &inputs.signals,
        &inputs.pitch,
        inputs.sentiment.as_ref(),
        &technical_raw,
        &placement_raw,
    )?;

    info!(
        "Evaluated answer: cs={:.1} tcs={} ({:?}) final={:.1}",
        report.cs_score, report.tcs_score, report.tcs_band, report.final_score
    );

    Ok(report)
}
