use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::pipeline::evaluate_answer;
use crate::models::evaluation::{FinalEvaluationReport, QuestionInput, TechnicalEvaluationResult};
use crate::questions::{generate_interview_questions, InterviewRound, QuestionGenerationRequest};
use crate::state::AppState;
use crate::store::Session;

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// POST /api/interview/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let session_id = state.sessions.create(req.metadata);
    Ok(Json(CreateSessionResponse { session_id }))
}

/// GET /api/interview/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    let session = state.sessions.snapshot(id).await?;
    Ok(Json(session))
}

/// DELETE /api/interview/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

#[derive(Deserialize)]
pub struct GenerateQuestionsRequest {
    pub role: String,
    pub experience: String,
    pub company_type: String,
    pub interview_round: InterviewRound,
    /// When supplied, generated questions are appended to the session.
    pub session_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<String>,
}

/// POST /api/interview/generate-questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(req): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let generation_req = QuestionGenerationRequest {
        role: req.role,
        experience: req.experience,
        company_type: req.company_type,
        interview_round: req.interview_round,
    };

    let questions = generate_interview_questions(state.llm.as_ref(), &generation_req).await?;

    if let Some(session_id) = req.session_id {
        for question in &questions {
            state
                .sessions
                .append_question(session_id, question.clone())
                .await?;
        }
    }

    Ok(Json(GenerateQuestionsResponse { questions }))
}

/// POST /api/interview/evaluate
///
/// Multipart form: `audio` (the recorded answer), `questions` (a JSON
/// string, JSON list, or plain text question), optional `session_id`.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FinalEvaluationReport>, AppError> {
    let mut audio_bytes: Option<Vec<u8>> = None;
    let mut question = QuestionInput::default();
    let mut session_id: Option<Uuid> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audio" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read audio: {e}")))?;
                audio_bytes = Some(bytes.to_vec());
            }
            "questions" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read questions: {e}")))?;
                // Accept a JSON string/list or a bare question string.
                question = serde_json::from_str(&text)
                    .unwrap_or_else(|_| QuestionInput::Single(text));
            }
            "session_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read session_id: {e}")))?;
                let id = text
                    .trim()
                    .parse::<Uuid>()
                    .map_err(|e| AppError::Validation(format!("Invalid session_id: {e}")))?;
                session_id = Some(id);
            }
            _ => {}
        }
    }

    let audio_bytes = audio_bytes
        .ok_or_else(|| AppError::Validation("Missing 'audio' multipart field".to_string()))?;

    // Stage the upload; the temp file lives until evaluation finishes.
    let staged = tempfile::Builder::new()
        .prefix("interview-answer-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| AppError::Audio(format!("staging upload: {e}")))?;
    tokio::fs::write(staged.path(), &audio_bytes)
        .await
        .map_err(|e| AppError::Audio(format!("staging upload: {e}")))?;

    let report = evaluate_answer(&state, staged.path(), &question).await?;

    if let Some(id) = session_id {
        let persisted = report.clone();
        state
            .sessions
            .update(id, move |session| {
                session.answers.push(persisted.transcript.clone());
                session.transcript = persisted.transcript;
                session.cs_score = Some(persisted.cs_score);
                session.tcs_result = Some(TechnicalEvaluationResult {
                    score: persisted.tcs_score,
                    band: persisted.tcs_band,
                    verdict: persisted.tcs_verdict,
                    issues: persisted.tcs_issues,
                    improvement_points: persisted.tcs_improvements,
                });
                session.final_score = Some(persisted.final_score);
                session.placement_feedback = Some(persisted.placement_feedback);
            })
            .await?;
    }

    Ok(Json(report))
}
