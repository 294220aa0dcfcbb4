//! Bulk URL export.
//!
//! Builds a two-row CSV table for a set of records: the header row holds
//! the original filenames, the data row the public URLs. The table is
//! written into the uploads directory as a throwaway artifact and served
//! like any other static file; nothing tracks or cleans it up.

use pixwall_core::models::{original_url, ImageRecord};
use pixwall_core::AppError;

/// Serialize records into the URL table. Column order follows the record
/// order given by the caller.
pub fn build_url_table(records: &[ImageRecord], base_url: &str) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = records
        .iter()
        .map(|r| r.original_filename.as_str())
        .collect();
    writer
        .write_record(&header)
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    let urls: Vec<String> = records
        .iter()
        .map(|r| original_url(base_url, &r.filename))
        .collect();
    writer
        .write_record(&urls)
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))?;

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV write error: {}", e)))
}

/// Filename for a freshly built export artifact.
pub fn export_name() -> String {
    format!("image_urls_{}.csv", pixwall_storage::naming::random_suffix())
}
