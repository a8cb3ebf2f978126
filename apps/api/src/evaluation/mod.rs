// Resume evaluation engine.
// Implements: text extraction, scoring request build, provider dispatch,
// response validation, leaderboard, orchestration.
// All provider calls go through llm_client via scoring_client.

pub mod extractor;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod request_builder;
pub mod scoring_client;
pub mod validator;

pub use extractor::PdfTextExtractor;
pub use leaderboard::Leaderboard;
pub use orchestrator::Evaluator;
pub use scoring_client::ScoringClient;
