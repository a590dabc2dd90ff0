//! Question generation endpoint

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::generation;
use crate::AppState;

/// POST /api/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    if payload.terms.is_empty() {
        return Err(ApiError::BadRequest("no terms".to_string()));
    }
    if payload.config.n == 0 {
        return Err(ApiError::BadRequest("config.n must be at least 1".to_string()));
    }

    let questions = generation::generate(&state.llm, &payload).await?;
    Ok(Json(GenerateResponse { questions }))
}
