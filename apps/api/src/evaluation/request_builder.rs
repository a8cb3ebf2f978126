//! Scoring Request Builder — pure and deterministic. Same inputs, same payload.

use serde::Serialize;

use crate::evaluation::prompts::SCORING_SYSTEM;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// The provider-agnostic payload for one scoring call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRequest {
    pub system: String,
    pub user: String,
}

/// Field order is the serialization order, which keeps the user message stable.
#[derive(Serialize)]
struct ScoringInput<'a> {
    job_description: &'a str,
    user_resume: &'a str,
}

pub fn system_instruction() -> String {
    format!("{SCORING_SYSTEM}\n\n{JSON_ONLY_INSTRUCTION}")
}

/// Builds the scoring payload. Both texts are embedded verbatim inside a
/// JSON object so quotes or braces in a resume cannot break the prompt.
pub fn build_scoring_request(job_description: &str, resume_text: &str) -> ScoringRequest {
    let input = ScoringInput {
        job_description,
        user_resume: resume_text,
    };
    // Serializing two borrowed strings cannot fail.
    let user = serde_json::to_string(&input).unwrap_or_default();

    ScoringRequest {
        system: system_instruction(),
        user,
    }
}
