use std::sync::Arc;

use axum::{extract::State, Json};
use pixwall_core::models::ImageRecord;
use pixwall_core::AppError;
use pixwall_storage::LocalStore;
use serde::{Deserialize, Serialize};

use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct BatchDeleteResponse {
    pub success: bool,
    pub deleted_count: usize,
    pub failed_count: usize,
    pub message: String,
}

/// Batch delete with partial-success accounting. Ids that resolve to no
/// record are skipped silently; per-image file failures are counted but
/// never abort the batch. All surviving row deletions land in a single
/// statement at the end.
#[tracing::instrument(skip(state, body), fields(requested = body.0.ids.len(), operation = "batch_delete"))]
pub async fn batch_delete(
    State(state): State<Arc<AppState>>,
    body: ValidatedJson<IdsRequest>,
) -> Result<Json<BatchDeleteResponse>, HttpAppError> {
    let ids = body.0.ids;
    if ids.is_empty() {
        return Err(AppError::BadRequest("No images selected".to_string()).into());
    }

    let records = state.repo.get_by_ids(&ids).await?;

    let (deletable, failed_count) = remove_record_files(&state.store, &records).await;

    if !deletable.is_empty() {
        state.repo.delete_many(&deletable).await?;
    }

    let deleted_count = deletable.len();
    tracing::info!(deleted_count, failed_count, "Batch delete finished");
    Ok(Json(BatchDeleteResponse {
        success: true,
        deleted_count,
        failed_count,
        message: format!("{} images deleted, {} failed", deleted_count, failed_count),
    }))
}

/// Remove the on-disk files for each record, tolerating absence. Every
/// record lands in exactly one bucket: its id in the deletable list, or
/// one tick of the failure count.
async fn remove_record_files(store: &LocalStore, records: &[ImageRecord]) -> (Vec<i64>, usize) {
    let mut deletable = Vec::with_capacity(records.len());
    let mut failed_count = 0usize;

    for record in records {
        let mut files_ok = true;
        if let Err(e) = store.delete_original(&record.filename).await {
            tracing::warn!(error = %e, filename = %record.filename, "Failed to delete original");
            files_ok = false;
        }
        if let Err(e) = store.delete_thumbnail(&record.filename).await {
            tracing::warn!(error = %e, filename = %record.filename, "Failed to delete thumbnail");
            files_ok = false;
        }
        if files_ok {
            deletable.push(record.id);
        } else {
            failed_count += 1;
        }
    }

    (deletable, failed_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
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

    #[tokio::test]
    async fn test_accounting_covers_every_record() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        store.write_original("aaaa_one.png", b"data").await.unwrap();
        // A name the store refuses to resolve makes both deletes fail.
        let records = vec![
            record(1, "aaaa_one.png"),
            record(2, "aaaa_absent.png"),
            record(3, "../escape.png"),
        ];

        let (deletable, failed_count) = remove_record_files(&store, &records).await;

        assert_eq!(deletable, vec![1, 2]);
        assert_eq!(failed_count, 1);
        assert_eq!(deletable.len() + failed_count, records.len());
        assert!(!store.original_exists("aaaa_one.png").await.unwrap());
    }

    #[tokio::test]
    async fn test_absent_files_still_count_as_deleted() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path()).await.unwrap();

        let records = vec![record(7, "aaaa_gone.jpg")];
        let (deletable, failed_count) = remove_record_files(&store, &records).await;

        assert_eq!(deletable, vec![7]);
        assert_eq!(failed_count, 0);
    }
}
