use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use pixwall_core::models::ImageRecord;
use pixwall_core::AppError;
use pixwall_processing::Thumbnailer;
use pixwall_storage::LocalStore;
use serde::Serialize;

use crate::error::HttpAppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub success: bool,
    pub total_images: usize,
    pub generated: usize,
    pub failed: usize,
}

/// Thumbnail backfill sweep: walks every record and regenerates the
/// thumbnails that are missing. Gated on the admin API key; without one
/// configured the endpoint is disabled outright.
#[tracing::instrument(skip(state, headers), fields(operation = "generate_missing_thumbnails"))]
pub async fn generate_missing_thumbnails(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BackfillResponse>, HttpAppError> {
    let expected = state
        .config
        .admin_api_key
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Maintenance endpoints are disabled".to_string()))?;
    let provided = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        return Err(AppError::Unauthorized("Invalid API key".to_string()).into());
    }

    let records = state.repo.list_all().await?;
    let total_images = records.len();

    let (generated, failed) =
        backfill_thumbnails(&state.store, &state.thumbnailer, &records).await;

    tracing::info!(total_images, generated, failed, "Thumbnail backfill finished");
    Ok(Json(BackfillResponse {
        success: true,
        total_images,
        generated,
        failed,
    }))
}

/// Generate thumbnails for records that have an original on disk but no
/// thumbnail. Records whose original is gone are skipped outright, so
/// `failed` counts generation failures only. Returns (generated, failed).
async fn backfill_thumbnails(
    store: &LocalStore,
    thumbnailer: &Thumbnailer,
    records: &[ImageRecord],
) -> (usize, usize) {
    let mut generated = 0usize;
    let mut failed = 0usize;

    for record in records {
        let has_thumbnail = store
            .thumbnail_exists(&record.filename)
            .await
            .unwrap_or(false);
        if has_thumbnail {
            continue;
        }
        let has_original = store
            .original_exists(&record.filename)
            .await
            .unwrap_or(false);
        if !has_original {
            tracing::debug!(filename = %record.filename, "Original missing, skipping backfill");
            continue;
        }

        let paths = store
            .original_path(&record.filename)
            .and_then(|o| store.thumbnail_path(&record.filename).map(|t| (o, t)));
        let (original, thumbnail) = match paths {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(error = %e, filename = %record.filename, "Skipping invalid storage name");
                failed += 1;
                continue;
            }
        };

        let thumbnailer = thumbnailer.clone();
        let ok = tokio::task::spawn_blocking(move || thumbnailer.generate(&original, &thumbnail))
            .await
            .unwrap_or(false);
        if ok {
            generated += 1;
        } else {
            failed += 1;
        }
    }

    (generated, failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use tempfile::tempdir;

    fn record(id: i64, filename: &str) -> ImageRecord {
        ImageRecord {
            id,
            filename: filename.to_string(),
            original_filename: filename.to_string(),
            upload_date: Utc::now(),
            filesize: Some(100),
            filetype: Some("image/png".to_string()),
        }
    }

    async fn write_original_image(store: &LocalStore, name: &str) {
        let path = store.original_path(name).unwrap();
        let img = RgbImage::from_pixel(40, 20, Rgb([10, 200, 30]));
        DynamicImage::ImageRgb8(img)
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
    }

    #[tokio::test]
    async fn test_backfill_generates_missing_thumbnails() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();
        let thumbnailer = Thumbnailer::new(300);

        write_original_image(&store, "aaaa_one.png").await;
        let records = vec![record(1, "aaaa_one.png")];

        let (generated, failed) = backfill_thumbnails(&store, &thumbnailer, &records).await;
        assert_eq!((generated, failed), (1, 0));
        assert!(store.thumbnail_exists("aaaa_one.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_backfill_skips_missing_originals() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();
        let thumbnailer = Thumbnailer::new(300);

        // No file on disk for this record: skipped, not a failure.
        let records = vec![record(1, "aaaa_gone.png")];

        let (generated, failed) = backfill_thumbnails(&store, &thumbnailer, &records).await;
        assert_eq!((generated, failed), (0, 0));
    }

    #[tokio::test]
    async fn test_backfill_counts_generation_failures() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();
        let thumbnailer = Thumbnailer::new(300);

        store
            .write_original("aaaa_bad.png", b"not an image")
            .await
            .unwrap();
        let records = vec![record(1, "aaaa_bad.png")];

        let (generated, failed) = backfill_thumbnails(&store, &thumbnailer, &records).await;
        assert_eq!((generated, failed), (0, 1));
    }

    #[tokio::test]
    async fn test_backfill_leaves_existing_thumbnails_alone() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();
        let thumbnailer = Thumbnailer::new(300);

        write_original_image(&store, "aaaa_done.png").await;
        let thumb = store.thumbnail_path("aaaa_done.png").unwrap();
        std::fs::write(&thumb, b"existing").unwrap();
        let records = vec![record(1, "aaaa_done.png")];

        let (generated, failed) = backfill_thumbnails(&store, &thumbnailer, &records).await;
        assert_eq!((generated, failed), (0, 0));
        assert_eq!(std::fs::read(&thumb).unwrap(), b"existing");
    }
}
