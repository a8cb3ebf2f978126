// Prompt constants for resume scoring.
// Reuses the JSON-only fragment from llm_client::prompts.

/// Scoring contract given to the provider. The four fields here are exactly
/// what `validator::parse_score_fields` enforces.
pub const SCORING_SYSTEM: &str = "You are an expert ATS (Applicant Tracking System) and resume recruiter. \
    Compare the job description (job_description) with the candidate resume (user_resume). \
    Calculate a match score from 0 to 100 based on skills, experience and keywords.

Return a JSON object with this EXACT schema:
{
  \"score\": 0,
  \"suggestion\": \"Brief advice (max 20 words).\",
  \"justification\": \"Why this score? (max 20 words).\",
  \"edits\": [\"Specific edit 1\", \"Specific edit 2\", \"Specific edit 3\"]
}

Rules:
- score is a whole number between 0 and 100 inclusive.
- edits lists concrete changes to the resume, most impactful first.";
