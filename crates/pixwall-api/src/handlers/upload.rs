use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Multipart, State},
    Json,
};
use pixwall_core::models::ImageRecordView;
use pixwall_core::AppError;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::services::upload::{process_batch, UploadedFile};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<ImageRecordView>,
}

/// Upload handler: accepts `files[]` multipart fields and commits the
/// batch in one transaction. Files that fail individually are skipped;
/// the request fails only when every file does (or the commit does).
#[tracing::instrument(
    skip(state, multipart),
    fields(client_ip = %addr.ip(), operation = "upload")
)]
pub async fn upload_images(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(HttpAppError::from)? {
        if field.name() != Some("files[]") {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(HttpAppError::from)?;

        // Browsers submit an empty part when no file was picked.
        if original_name.is_empty() {
            continue;
        }
        files.push(UploadedFile {
            original_name,
            content_type,
            data,
        });
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".to_string()).into());
    }

    let file_count = files.len();
    let views = process_batch(&state, files).await?;
    tracing::info!(
        received = file_count,
        committed = views.len(),
        "Upload batch committed"
    );

    Ok(Json(UploadResponse { files: views }))
}
