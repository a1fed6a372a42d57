mod audio;
mod config;
mod errors;
mod evaluation;
mod interview;
mod llm_client;
mod models;
mod nlp;
mod questions;
mod routes;
mod scoring;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::audio::{
    HttpPitchAnalyzer, HttpSentimentClassifier, HttpTranscriber, NoSentiment, SentimentClassifier,
};
use crate::config::Config;
use crate::llm_client::HttpCompletionModel;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::SessionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting interview API v{}", env!("CARGO_PKG_VERSION"));

    // Completion model
    let llm = Arc::new(HttpCompletionModel::new(
        &config.llm_base_url,
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    ));
    info!("Completion model client initialized (model: {})", config.llm_model);

    // Audio-side collaborators
    let transcriber = Arc::new(HttpTranscriber::new(&config.transcriber_url));
    let pitch = Arc::new(HttpPitchAnalyzer::new(&config.pitch_url));
    let sentiment: Arc<dyn SentimentClassifier> = match &config.sentiment_url {
        Some(url) => {
            info!("Sentiment classifier enabled at {url}");
            Arc::new(HttpSentimentClassifier::new(url))
        }
        None => {
            info!("No sentiment endpoint configured; sentiment adjustment disabled");
            Arc::new(NoSentiment)
        }
    };

    // Session store
    let sessions = Arc::new(SessionStore::new());

    // Build app state
    let state = AppState {
        llm,
        transcriber,
        pitch,
        sentiment,
        analyzer: None,
        sessions,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
