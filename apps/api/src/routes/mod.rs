pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

/// Uploaded answers are raw audio; allow well beyond the 2 MB default.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/interview/sessions",
            post(handlers::handle_create_session),
        )
        .route(
            "/api/interview/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/interview/generate-questions",
            post(handlers::handle_generate_questions),
        )
        .route("/api/interview/evaluate", post(handlers::handle_evaluate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
