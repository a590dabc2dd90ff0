//! Term source endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::ingest::ingest;
use crate::workspace::Workspace;
use crate::AppState;

fn ensure_idle(workspace: &Workspace) -> Result<()> {
    if workspace.session().is_active() {
        return Err(ApiError::Conflict(
            "sources cannot change while a round is in progress".to_string(),
        ));
    }
    Ok(())
}

fn list_sources(workspace: &Workspace) -> SourceListResponse {
    SourceListResponse {
        sources: workspace.store.sources().iter().map(SourceSummary::from).collect(),
        term_count: workspace.store.term_count(),
    }
}

/// GET /api/sources
pub async fn list(State(state): State<AppState>) -> Result<Json<SourceListResponse>> {
    let workspace = state.workspace.lock().await;
    Ok(Json(list_sources(&workspace)))
}

/// POST /api/sources
pub async fn upload(
    State(state): State<AppState>,
    Json(payload): Json<UploadSourceRequest>,
) -> Result<Json<UploadSourceResponse>> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("file name is required".to_string()));
    }

    let mut workspace = state.workspace.lock().await;
    ensure_idle(&workspace)?;

    let ingested = ingest(&mut workspace.store, &payload.name, &payload.content)?;
    let source = SourceSummary::from(ingested.source);
    let skipped_lines = ingested.skipped_lines;

    Ok(Json(UploadSourceResponse {
        source,
        skipped_lines,
        term_count: workspace.store.term_count(),
    }))
}

/// DELETE /api/sources/{id}
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SourceListResponse>> {
    let mut workspace = state.workspace.lock().await;
    ensure_idle(&workspace)?;

    if !workspace.store.remove_source(&id) {
        return Err(ApiError::NotFound(format!("source {}", id)));
    }
    tracing::info!(source_id = %id, "source removed");

    Ok(Json(list_sources(&workspace)))
}

/// DELETE /api/sources
pub async fn clear(State(state): State<AppState>) -> Result<Json<DeleteSourcesResponse>> {
    let mut workspace = state.workspace.lock().await;
    ensure_idle(&workspace)?;

    let removed = workspace.store.sources().len();
    workspace.store.clear();

    Ok(Json(DeleteSourcesResponse { removed }))
}
