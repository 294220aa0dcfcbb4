use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use pixwall_core::models::{ImageRecordView, Page};
use pixwall_core::AppError;
use serde::{Deserialize, Serialize};

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    /// Kept as a string so a junk value falls back to page 1 instead
    /// of rejecting the request.
    pub page: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub images: Vec<ImageRecordView>,
    pub page: u32,
    pub total_pages: u32,
    pub total_images: i64,
}

/// Gallery listing, newest first. `?format=json` returns the JSON
/// envelope; anything else renders the HTML page.
#[tracing::instrument(skip(state), fields(operation = "gallery"))]
pub async fn gallery(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);
    let wants_json = query.format.as_deref() == Some("json");

    match load_page(&state, page).await {
        Ok(page_data) => {
            if wants_json {
                Json(GalleryResponse {
                    images: page_data.items,
                    page: page_data.page,
                    total_pages: page_data.total_pages,
                    total_images: page_data.total_items,
                })
                .into_response()
            } else {
                Html(views::gallery::gallery_page(&page_data).into_string()).into_response()
            }
        }
        Err(e) => {
            if wants_json {
                HttpAppError::from(e).into_response()
            } else {
                tracing::error!(error = %e, "Failed to load gallery page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(views::gallery::error_page("Failed to load gallery").into_string()),
                )
                    .into_response()
            }
        }
    }
}

async fn load_page(state: &AppState, page: u32) -> Result<Page<ImageRecordView>, AppError> {
    let per_page = state.config.page_size;
    let (records, total) = state.repo.list_page(page, per_page).await?;
    let views = records
        .iter()
        .map(|r| ImageRecordView::from_record(r, &state.config.public_base_url))
        .collect();
    Ok(Page::new(views, page, per_page, total))
}
