use std::sync::Arc;

use crate::config::Config;
use crate::evaluation::{Evaluator, Leaderboard};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Session leaderboard. The evaluator holds the same `Arc`.
    pub leaderboard: Arc<Leaderboard>,
    pub evaluator: Arc<Evaluator>,
}
