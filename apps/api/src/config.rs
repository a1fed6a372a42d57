use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI-compatible completions endpoint base URL.
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub transcriber_url: String,
    pub pitch_url: String,
    /// Optional — without it, sentiment is simply never applied.
    pub sentiment_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            llm_base_url: require_env("LLM_BASE_URL")?,
            llm_api_key: std::env::var("LLM_API_KEY").ok(),
            llm_model: std::env::var("LLM_MODEL")
                .unwrap_or_else(|_| "mistral-7b-instruct".to_string()),
            transcriber_url: require_env("TRANSCRIBER_URL")?,
            pitch_url: require_env("PITCH_URL")?,
            sentiment_url: std::env::var("SENTIMENT_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
