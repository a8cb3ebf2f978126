//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::evaluation::models::{
    EvaluationReport, EvaluationRequest, LeaderboardEntry, UploadedDocument,
};
use crate::state::AppState;

const JOB_DESCRIPTION_FIELD: &str = "job_description";
const FILES_FIELD: &str = "files";

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// POST /api/v1/evaluate
///
/// Multipart body: one `job_description` text field and one or more `files` parts.
/// Returns per-file outcomes in upload order plus the full ranked leaderboard.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<EvaluationReport>, AppError> {
    let request = read_evaluation_request(multipart).await?;
    let report = state.evaluator.evaluate(request).await;
    Ok(Json(report))
}

/// GET /api/v1/leaderboard
pub async fn handle_get_leaderboard(State(state): State<AppState>) -> Json<LeaderboardResponse> {
    Json(LeaderboardResponse {
        leaderboard: state.leaderboard.ranked(),
    })
}

/// POST /api/v1/leaderboard/clear
///
/// Empties the leaderboard and returns the (now empty) ranked view.
pub async fn handle_clear_leaderboard(
    State(state): State<AppState>,
) -> Json<LeaderboardResponse> {
    let leaderboard = state.leaderboard.clear();
    tracing::info!("Leaderboard cleared");
    Json(LeaderboardResponse { leaderboard })
}

async fn read_evaluation_request(mut multipart: Multipart) -> Result<EvaluationRequest, AppError> {
    let mut job_description: Option<String> = None;
    let mut documents = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            JOB_DESCRIPTION_FIELD => {
                job_description = Some(field.text().await?);
            }
            FILES_FIELD => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                documents.push(UploadedDocument { filename, bytes });
            }
            _ => {}
        }
    }

    let job_description = job_description
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description cannot be empty".to_string()))?;

    if documents.is_empty() {
        return Err(AppError::Validation(
            "At least one file must be uploaded".to_string(),
        ));
    }

    Ok(EvaluationRequest {
        job_description,
        documents,
    })
}
