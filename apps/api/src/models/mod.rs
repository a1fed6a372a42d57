pub mod evaluation;
pub mod transcription;
