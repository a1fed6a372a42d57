//! Interview question generation.
//!
//! Builds a round-specific prompt, runs the completion model through
//! structured recovery, and enforces the per-round question count:
//! surplus questions are truncated, a shortfall is rejected. A
//! fabricated or padded question list would defeat the round contract,
//! so shortfalls are errors rather than silently accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_CONTRACT;
use crate::llm_client::{run_structured, CompletionModel};

const QUESTION_MAX_NEW_TOKENS: u32 = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewRound {
    #[serde(rename = "HR")]
    Hr,
    Technical,
    #[serde(rename = "DSA")]
    Dsa,
    Coding,
    Communication,
}

impl InterviewRound {
    /// Number of questions each round must produce.
    pub fn expected_count(self) -> usize {
        match self {
            InterviewRound::Hr => 6,
            InterviewRound::Technical => 8,
            InterviewRound::Dsa => 7,
            InterviewRound::Coding => 5,
            InterviewRound::Communication => 5,
        }
    }

    fn label(self) -> &'static str {
        match self {
            InterviewRound::Hr => "HR",
            InterviewRound::Technical => "Technical",
            InterviewRound::Dsa => "DSA",
            InterviewRound::Coding => "Coding",
            InterviewRound::Communication => "Communication",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionGenerationRequest {
    pub role: String,
    pub experience: String,
    pub company_type: String,
    pub interview_round: InterviewRound,
}

/// Generates all questions for the requested round.
pub async fn generate_interview_questions(
    model: &dyn CompletionModel,
    req: &QuestionGenerationRequest,
) -> Result<Vec<String>, AppError> {
    let prompt = build_question_prompt(req);
    let raw = run_structured(model, &prompt, QUESTION_MAX_NEW_TOKENS).await?;
    normalize_questions(&raw, req.interview_round)
}

/// Validates the recovered object and enforces the round's count
/// contract: truncate above it, reject below it.
pub fn normalize_questions(raw: &Value, round: InterviewRound) -> Result<Vec<String>, AppError> {
    let items = raw
        .get("questions")
        .ok_or(AppError::MissingField("questions"))?
        .as_array()
        .ok_or_else(|| AppError::MalformedField("'questions' is not a list".to_string()))?;

    let mut questions = Vec::with_capacity(items.len());
    for item in items {
        let q = item.as_str().ok_or_else(|| {
            AppError::MalformedField("'questions' contains a non-string entry".to_string())
        })?;
        let q = q.trim();
        if !q.is_empty() {
            questions.push(q.to_string());
        }
    }

    let expected = round.expected_count();
    if questions.len() < expected {
        return Err(AppError::MalformedField(format!(
            "{} round requires {} questions, model produced {}",
            round.label(),
            expected,
            questions.len()
        )));
    }
    if questions.len() > expected {
        debug!(
            "Truncating {} generated questions to the expected {}",
            questions.len(),
            expected
        );
        questions.truncate(expected);
    }

    Ok(questions)
}

fn build_question_prompt(req: &QuestionGenerationRequest) -> String {
    let round = req.interview_round.label();
    let count = req.interview_round.expected_count();
    format!(
        "You are a professional interviewer.\n\
        \n\
        Interview Context:\n\
        - Role: {role}\n\
        - Experience Level: {experience}\n\
        - Company Type: {company}\n\
        - Interview Round: {round}\n\
        \n\
        QUESTION COUNT RULE:\n\
        - {round} Round: exactly {count} questions\n\
        \n\
        {JSON_ONLY_CONTRACT}\n\
        \n\
        MANDATORY JSON FORMAT:\n\
        {{\n\
        \x20 \"questions\": [\n\
        \x20   \"question_1\",\n\
        \x20   \"question_2\",\n\
        \x20   \"question_3\"\n\
        \x20 ]\n\
        }}\n\
        \n\
        IMPORTANT:\n\
        - The number of questions MUST exactly match the rule for the selected interview round.\n\
        \n\
        Return the JSON now and stop.",
        role = req.role,
        experience = req.experience,
        company = req.company_type,
    )
}
