use std::sync::Arc;

use axum::{extract::State, Json};
use pixwall_core::models::original_url;
use pixwall_core::AppError;
use serde::Serialize;

use crate::error::{HttpAppError, ValidatedJson};
use crate::handlers::batch::IdsRequest;
use crate::services::export;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DownloadUrlsResponse {
    pub url: String,
    pub count: usize,
}

/// Bulk URL export: builds the CSV table for the selected images,
/// drops it into the uploads directory, and returns its public URL.
#[tracing::instrument(skip(state, body), fields(requested = body.0.ids.len(), operation = "download_urls"))]
pub async fn download_urls(
    State(state): State<Arc<AppState>>,
    body: ValidatedJson<IdsRequest>,
) -> Result<Json<DownloadUrlsResponse>, HttpAppError> {
    let ids = body.0.ids;
    if ids.is_empty() {
        return Err(AppError::BadRequest("No images selected".to_string()).into());
    }

    let records = state.repo.get_by_ids(&ids).await?;
    if records.is_empty() {
        return Err(AppError::NotFound("No images found for the selected ids".to_string()).into());
    }

    let base_url = &state.config.public_base_url;
    let table = export::build_url_table(&records, base_url)?;
    let name = export::export_name();
    state.store.write_artifact(&name, &table).await?;

    tracing::info!(artifact = %name, count = records.len(), "Built URL export");
    Ok(Json(DownloadUrlsResponse {
        url: original_url(base_url, &name),
        count: records.len(),
    }))
}
