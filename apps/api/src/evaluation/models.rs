use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One uploaded file part, as received from the HTTP layer.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

/// A job description plus the documents to score against it. Lives for one call.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub job_description: String,
    pub documents: Vec<UploadedDocument>,
}

/// Text pulled out of a document that cleared the usability threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedDocument {
    pub filename: String,
    pub text: String,
}

/// The four fields the provider is contracted to return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFields {
    pub score: u8,
    pub suggestion: String,
    pub justification: String,
    pub edits: Vec<String>,
}

/// A scored resume. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub id: Uuid,
    pub filename: String,
    pub score: u8,
    pub suggestion: String,
    pub justification: String,
    pub edits: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl ScoreResult {
    pub fn new(filename: String, fields: ScoreFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            score: fields.score,
            suggestion: fields.suggestion,
            justification: fields.justification,
            edits: fields.edits,
            evaluated_at: Utc::now(),
        }
    }
}

/// A `ScoreResult` with its position in the ranked leaderboard. `rank` is
/// computed on read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub result: ScoreResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ProviderError,
    SchemaError,
    ConfigurationError,
}

/// Per-document result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Scored {
        result: ScoreResult,
    },
    Skipped {
        filename: String,
        reason: String,
    },
    Failed {
        filename: String,
        kind: FailureKind,
        reason: String,
    },
}

impl DocumentOutcome {
    #[cfg(test)]
    pub fn filename(&self) -> &str {
        match self {
            DocumentOutcome::Scored { result } => &result.filename,
            DocumentOutcome::Skipped { filename, .. } | DocumentOutcome::Failed { filename, .. } => {
                filename
            }
        }
    }

    pub fn score_result(&self) -> Option<&ScoreResult> {
        match self {
            DocumentOutcome::Scored { result } => Some(result),
            _ => None,
        }
    }
}

/// Everything returned to the caller for one evaluation call.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub results: Vec<DocumentOutcome>,
    pub leaderboard: Vec<LeaderboardEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(score: u8) -> ScoreFields {
        ScoreFields {
            score,
            suggestion: "Add metrics".to_string(),
            justification: "Strong match".to_string(),
            edits: vec!["Quantify achievements".to_string()],
        }
    }

    #[test]
    fn test_score_results_get_distinct_ids() {
        let a = ScoreResult::new("a.pdf".to_string(), fields(10));
        let b = ScoreResult::new("a.pdf".to_string(), fields(10));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_leaderboard_entry_flattens_result() {
        let entry = LeaderboardEntry {
            rank: 1,
            result: ScoreResult::new("cv.pdf".to_string(), fields(82)),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["rank"], 1);
        assert_eq!(value["score"], 82);
        assert_eq!(value["filename"], "cv.pdf");
    }

    #[test]
    fn test_outcome_is_tagged_by_status() {
        let skipped = DocumentOutcome::Skipped {
            filename: "scan.pdf".to_string(),
            reason: "insufficient extractable text".to_string(),
        };
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["reason"], "insufficient extractable text");

        let failed = DocumentOutcome::Failed {
            filename: "cv.pdf".to_string(),
            kind: FailureKind::ProviderError,
            reason: "provider timeout".to_string(),
        };
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["kind"], "provider_error");
        assert_eq!(failed.filename(), "cv.pdf");
        assert!(failed.score_result().is_none());
    }
}
