pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route("/api/v1/evaluate", post(handlers::handle_evaluate))
        .route("/api/v1/leaderboard", get(handlers::handle_get_leaderboard))
        .route(
            "/api/v1/leaderboard/clear",
            post(handlers::handle_clear_leaderboard),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
