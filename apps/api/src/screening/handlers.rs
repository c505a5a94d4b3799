use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::evaluation::AggregatedResult;
use crate::models::job_spec::JobSpecification;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_spec: JobSpecification,
}

/// POST /api/v1/screening/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AggregatedResult>, AppError> {
    if req.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text must not be empty".to_string(),
        ));
    }
    let result = state
        .pipeline
        .analyze(&req.resume_text, &req.job_spec)
        .await?;
    Ok(Json(result))
}
