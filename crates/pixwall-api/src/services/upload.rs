//! Upload pipeline.
//!
//! Each file moves through validate -> sanitize/name -> write -> thumbnail
//! -> stage. Per-file failures skip that file and undo its side effects;
//! the surviving staged records are committed in a single transaction at
//! the end, so either every surviving upload gets an id or none do.
//!
//! Known gap: if the final commit fails, files already written to storage
//! are not removed. They are logged as orphans instead of being deleted,
//! because a delete sweep racing a retried commit would be worse than
//! leftover files.

use bytes::Bytes;
use pixwall_core::models::{ImageRecordView, NewImage};
use pixwall_core::AppError;
use pixwall_db::with_transaction;
use pixwall_processing::ValidationError;
use pixwall_storage::naming;
use pixwall_storage::LocalStore;

use crate::state::AppState;

/// One file extracted from the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Storage writes performed for a single file, recorded in order so a
/// per-file failure can undo them newest-first.
#[derive(Debug)]
enum SideEffect {
    OriginalWritten(String),
    ThumbnailWritten(String),
}

#[derive(Debug, Default)]
struct SideEffects {
    performed: Vec<SideEffect>,
}

impl SideEffects {
    fn record(&mut self, effect: SideEffect) {
        self.performed.push(effect);
    }

    /// Undo recorded writes in reverse order. Deletions tolerate absence;
    /// a failed undo is logged and the rest still run.
    async fn unwind(self, store: &LocalStore) {
        for effect in self.performed.into_iter().rev() {
            let result = match &effect {
                SideEffect::OriginalWritten(name) => store.delete_original(name).await,
                SideEffect::ThumbnailWritten(name) => store.delete_thumbnail(name).await,
            };
            if let Err(e) = result {
                tracing::warn!(error = %e, effect = ?effect, "Failed to undo upload side effect");
            }
        }
    }
}

/// Process a batch of uploaded files and commit the survivors.
///
/// Returns the committed records as client views. Fails with
/// `AllUploadsFailed` when no file survives its per-file pipeline, and
/// with the underlying database error when the final commit fails.
pub async fn process_batch(
    state: &AppState,
    files: Vec<UploadedFile>,
) -> Result<Vec<ImageRecordView>, AppError> {
    let mut staged: Vec<NewImage> = Vec::new();

    for file in files {
        let original_name = file.original_name.clone();
        let mut effects = SideEffects::default();
        match process_one(state, &file, &mut effects).await {
            Ok(new_image) => staged.push(new_image),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    original_name = %original_name,
                    "Skipping failed upload"
                );
                effects.unwind(&state.store).await;
            }
        }
    }

    if staged.is_empty() {
        return Err(AppError::AllUploadsFailed);
    }

    let staged_names: Vec<String> = staged.iter().map(|s| s.filename.clone()).collect();
    let repo = state.repo.clone();
    let staged_for_tx = staged;

    let records = with_transaction(state.repo.pool(), move |tx| {
        Box::pin(async move { repo.insert_batch_tx(tx, &staged_for_tx).await })
    })
    .await
    .map_err(|e| {
        // The files for these names stay on disk; see the module docs.
        tracing::error!(
            error = %e,
            orphaned_files = ?staged_names,
            "Batch commit failed, stored files are now orphaned"
        );
        AppError::from(e)
    })?;

    let base_url = &state.config.public_base_url;
    Ok(records
        .iter()
        .map(|r| ImageRecordView::from_record(r, base_url))
        .collect())
}

/// Run one file through the pipeline, recording storage writes in
/// `effects` so the caller can undo them if this returns an error.
async fn process_one(
    state: &AppState,
    file: &UploadedFile,
    effects: &mut SideEffects,
) -> Result<NewImage, AppError> {
    // Extension allow-list runs before any bytes touch disk.
    naming::validate_extension(&file.original_name)
        .map_err(|e| AppError::InvalidFilename(e.to_string()))?;

    let sanitized = naming::sanitize_filename(&file.original_name)
        .map_err(|e| AppError::InvalidFilename(e.to_string()))?;
    let storage_name = naming::storage_name(&sanitized);

    state
        .validator
        .validate_size(file.data.len())
        .map_err(|e| match e {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(e.to_string()),
            ValidationError::EmptyFile => AppError::SaveFailure(e.to_string()),
        })?;

    let original_path = state
        .store
        .write_original(&storage_name, &file.data)
        .await
        .map_err(|e| AppError::SaveFailure(e.to_string()))?;
    effects.record(SideEffect::OriginalWritten(storage_name.clone()));

    let thumbnail_path = state
        .store
        .thumbnail_path(&storage_name)
        .map_err(|e| AppError::SaveFailure(e.to_string()))?;

    // Thumbnailing is best-effort: a decode or encode failure is logged
    // inside the thumbnailer and the upload proceeds without one.
    let thumbnailer = state.thumbnailer.clone();
    let generated = tokio::task::spawn_blocking(move || {
        thumbnailer.generate(&original_path, &thumbnail_path)
    })
    .await
    .unwrap_or(false);
    if generated {
        effects.record(SideEffect::ThumbnailWritten(storage_name.clone()));
    }

    Ok(NewImage::new(
        storage_name,
        sanitized,
        file.data.len() as i64,
        file.content_type.clone(),
    ))
}
