//! Grading endpoint for generated questions

use axum::{extract::State, Json};

use crate::error::Result;
use crate::models::*;
use crate::services::coaching;
use crate::AppState;

/// POST /api/grade
pub async fn grade(
    State(state): State<AppState>,
    Json(payload): Json<GradeRequest>,
) -> Result<Json<GradeResponse>> {
    let results = coaching::grade_answers(&payload.questions, &payload.answers);
    let wrong = coaching::wrong_answers(&payload.questions, &results);

    let notebook = coaching::coach(&state.llm, &wrong).await?;

    Ok(Json(GradeResponse { results, notebook }))
}
