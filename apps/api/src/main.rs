mod config;
mod errors;
mod evaluation;
mod llm_client;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::evaluation::{Evaluator, Leaderboard, PdfTextExtractor, ScoringClient};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize provider client
    let llm = LlmClient::new(&config)?;
    if config.provider_configured() {
        info!("LLM client initialized (model: {})", llm.model());
    } else {
        warn!("GROQ_API_KEY is not set; every scoring call will fail until it is configured");
    }

    let scoring = ScoringClient::new(
        Arc::new(llm),
        config.provider_max_concurrency,
        config.provider_timeout,
    );
    info!(
        "Scoring client: max {} concurrent calls, {}s timeout",
        config.provider_max_concurrency,
        config.provider_timeout.as_secs()
    );

    // Session leaderboard lives for the life of the process
    let leaderboard = Arc::new(Leaderboard::new());
    let evaluator = Evaluator::new(
        Arc::new(PdfTextExtractor),
        scoring,
        Arc::clone(&leaderboard),
        config.min_text_chars,
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        leaderboard,
        evaluator: Arc::new(evaluator),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
