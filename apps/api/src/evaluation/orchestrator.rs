//! Evaluation Orchestrator — runs one pipeline per uploaded document.
//!
//! Flow per document: check upload → extract text → build request →
//! dispatch provider call → validate → append to leaderboard.
//!
//! Pipelines run concurrently and fail independently. Outcomes come back in
//! upload order regardless of which provider call finishes first, and the
//! ranked leaderboard is read only after every pipeline in the call is done.

use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::evaluation::extractor::{extract_document, TextExtractor, UnusableDocument};
use crate::evaluation::leaderboard::Leaderboard;
use crate::evaluation::models::{
    DocumentOutcome, EvaluationReport, EvaluationRequest, FailureKind, ScoreResult,
    UploadedDocument,
};
use crate::evaluation::request_builder::build_scoring_request;
use crate::evaluation::scoring_client::ScoringClient;
use crate::evaluation::validator::{validate_response, SchemaError};
use crate::llm_client::ProviderError;

pub const NO_RESULTS_MESSAGE: &str = "No valid PDFs were processed.";

/// Why a single document's pipeline stopped.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Unusable(#[from] UnusableDocument),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl EvaluationError {
    fn into_outcome(self, filename: String) -> DocumentOutcome {
        let reason = self.to_string();
        let kind = match self {
            EvaluationError::Unusable(_) => return DocumentOutcome::Skipped { filename, reason },
            EvaluationError::Provider(ProviderError::NotConfigured) => {
                FailureKind::ConfigurationError
            }
            EvaluationError::Provider(_) => FailureKind::ProviderError,
            EvaluationError::Schema(_) => FailureKind::SchemaError,
        };
        DocumentOutcome::Failed {
            filename,
            kind,
            reason,
        }
    }
}

pub struct Evaluator {
    extractor: Arc<dyn TextExtractor>,
    scoring: ScoringClient,
    leaderboard: Arc<Leaderboard>,
    min_text_chars: usize,
}

impl Evaluator {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        scoring: ScoringClient,
        leaderboard: Arc<Leaderboard>,
        min_text_chars: usize,
    ) -> Self {
        Self {
            extractor,
            scoring,
            leaderboard,
            min_text_chars,
        }
    }

    #[cfg(test)]
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn provider_configured(&self) -> bool {
        self.scoring.is_configured()
    }

    /// Scores every document in the request. Always returns one outcome per
    /// document; no single failure aborts the batch.
    pub async fn evaluate(&self, request: EvaluationRequest) -> EvaluationReport {
        let job_description = request.job_description.as_str();
        info!(
            "Evaluating {} document(s) against a {}-char job description",
            request.documents.len(),
            job_description.chars().count()
        );

        let pipelines = request
            .documents
            .iter()
            .map(|doc| self.evaluate_document(job_description, doc));
        let results = join_all(pipelines).await;

        let scored = results.iter().filter(|o| o.score_result().is_some()).count();
        let leaderboard = self.leaderboard.ranked();
        info!(
            "Evaluation finished: {scored}/{} scored, leaderboard holds {}",
            results.len(),
            leaderboard.len()
        );

        EvaluationReport {
            message: (scored == 0).then(|| NO_RESULTS_MESSAGE.to_string()),
            results,
            leaderboard,
        }
    }

    async fn evaluate_document(
        &self,
        job_description: &str,
        upload: &UploadedDocument,
    ) -> DocumentOutcome {
        match self.run_pipeline(job_description, upload).await {
            Ok(result) => {
                info!("Scored {}: {}/100", result.filename, result.score);
                DocumentOutcome::Scored { result }
            }
            Err(e) => {
                warn!("Skipping {}: {e}", upload.filename);
                e.into_outcome(upload.filename.clone())
            }
        }
    }

    async fn run_pipeline(
        &self,
        job_description: &str,
        upload: &UploadedDocument,
    ) -> Result<ScoreResult, EvaluationError> {
        let document =
            extract_document(Arc::clone(&self.extractor), upload, self.min_text_chars).await?;

        let request = build_scoring_request(job_description, &document.text);
        let raw = self.scoring.dispatch(request).wait().await?;
        let fields = validate_response(&raw)?;

        let result = ScoreResult::new(document.filename, fields);
        self.leaderboard.append(result.clone());
        Ok(result)
    }
}
