use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use pixwall_core::AppError;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub success: bool,
}

/// Single-image delete. Requires the `X-Requested-With: XMLHttpRequest`
/// marker so a plain link or form can't trigger it. Files are removed
/// first (tolerating absence), then the row.
#[tracing::instrument(skip(state, headers), fields(image_id = id, operation = "delete_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let requested_with = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok());
    if requested_with != Some("XMLHttpRequest") {
        return Err(AppError::BadRequest("Invalid request".to_string()).into());
    }

    let record = state
        .repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    // File deletions tolerate absence; a failure here is logged but the
    // row is still removed so the gallery stops referencing a file we
    // can no longer manage.
    if let Err(e) = state.store.delete_original(&record.filename).await {
        tracing::warn!(error = %e, filename = %record.filename, "Failed to delete original");
    }
    if let Err(e) = state.store.delete_thumbnail(&record.filename).await {
        tracing::warn!(error = %e, filename = %record.filename, "Failed to delete thumbnail");
    }

    let removed = state.repo.delete(id).await?;
    if removed == 0 {
        return Err(AppError::NotFound("Image not found".to_string()).into());
    }

    tracing::info!(filename = %record.filename, "Deleted image");
    Ok(Json(DeleteResponse {
        message: "Image deleted successfully".to_string(),
        success: true,
    }))
}
