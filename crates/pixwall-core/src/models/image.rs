//! Image metadata models.
//!
//! `ImageRecord` is the persisted row; `NewImage` is the staged,
//! pre-commit form (no id until the batch transaction commits);
//! `ImageRecordView` is the serialized representation handed to clients.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted image row. `filename` is the generated storage name and
/// maps 1:1 to a file in the uploads directory (and, best-effort, to a
/// thumbnail of the same name).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub upload_date: DateTime<Utc>,
    pub filesize: Option<i64>,
    pub filetype: Option<String>,
}

/// An image staged for persistence. Ids are assigned by the database on
/// commit, so this deliberately has none.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub filename: String,
    pub original_filename: String,
    pub upload_date: DateTime<Utc>,
    pub filesize: Option<i64>,
    pub filetype: Option<String>,
}

impl NewImage {
    pub fn new(
        filename: String,
        original_filename: String,
        filesize: i64,
        filetype: Option<String>,
    ) -> Self {
        Self {
            filename,
            original_filename,
            upload_date: Utc::now(),
            filesize: Some(filesize),
            filetype,
        }
    }
}

/// Client-facing representation of an image record.
#[derive(Debug, Clone, Serialize)]
pub struct ImageRecordView {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub url: String,
    pub thumbnail_url: String,
    /// Human-readable size, e.g. "12.3KB", or "Unknown".
    pub filesize: String,
    pub filetype: String,
    /// Formatted as `%Y-%m-%d %H:%M:%S` (UTC).
    pub upload_date: String,
}

impl ImageRecordView {
    /// Build the view from a committed record. `base_url` has no
    /// trailing slash (enforced by Config::validate).
    pub fn from_record(record: &ImageRecord, base_url: &str) -> Self {
        Self {
            id: record.id,
            filename: record.filename.clone(),
            original_filename: record.original_filename.clone(),
            url: original_url(base_url, &record.filename),
            thumbnail_url: thumbnail_url(base_url, &record.filename),
            filesize: human_filesize(record.filesize),
            filetype: record
                .filetype
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            upload_date: record.upload_date.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Public URL of a stored original.
pub fn original_url(base_url: &str, filename: &str) -> String {
    format!("{}/static/uploads/{}", base_url, filename)
}

/// Public URL of a thumbnail (same storage name, parallel directory).
pub fn thumbnail_url(base_url: &str, filename: &str) -> String {
    format!("{}/static/uploads/thumbnails/{}", base_url, filename)
}

fn human_filesize(filesize: Option<i64>) -> String {
    match filesize {
        Some(bytes) => format!("{:.1}KB", bytes as f64 / 1024.0),
        None => "Unknown".to_string(),
    }
}

/// One page of gallery results plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
    pub total_items: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total_items: i64) -> Self {
        Self {
            items,
            page,
            total_pages: total_pages(total_items, per_page),
            total_items,
        }
    }
}

/// ceil(total / per_page); 0 when the table is empty.
pub fn total_pages(total_items: i64, per_page: u32) -> u32 {
    if total_items <= 0 {
        return 0;
    }
    (total_items as u64).div_ceil(u64::from(per_page)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_record() -> ImageRecord {
        ImageRecord {
            id: 7,
            filename: "deadbeef_cat.jpg".to_string(),
            original_filename: "cat.jpg".to_string(),
            upload_date: Utc.with_ymd_and_hms(2026, 3, 14, 15, 9, 26).unwrap(),
            filesize: Some(12_600),
            filetype: Some("image/jpeg".to_string()),
        }
    }

    #[test]
    fn test_view_urls() {
        let view = ImageRecordView::from_record(&test_record(), "http://localhost:5000");
        assert_eq!(
            view.url,
            "http://localhost:5000/static/uploads/deadbeef_cat.jpg"
        );
        assert_eq!(
            view.thumbnail_url,
            "http://localhost:5000/static/uploads/thumbnails/deadbeef_cat.jpg"
        );
    }

    #[test]
    fn test_view_formatting() {
        let view = ImageRecordView::from_record(&test_record(), "http://localhost:5000");
        assert_eq!(view.filesize, "12.3KB");
        assert_eq!(view.upload_date, "2026-03-14 15:09:26");
        assert_eq!(view.filetype, "image/jpeg");
    }

    #[test]
    fn test_view_unknown_fields() {
        let mut record = test_record();
        record.filesize = None;
        record.filetype = None;
        let view = ImageRecordView::from_record(&record, "http://localhost:5000");
        assert_eq!(view.filesize, "Unknown");
        assert_eq!(view.filetype, "Unknown");
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 18), 0);
        assert_eq!(total_pages(-5, 18), 0);
        assert_eq!(total_pages(1, 18), 1);
        assert_eq!(total_pages(18, 18), 1);
        assert_eq!(total_pages(19, 18), 2);
        assert_eq!(total_pages(54, 18), 3);
    }

    #[test]
    fn test_page_envelope() {
        let page: Page<u8> = Page::new(vec![], 5, 18, 40);
        assert_eq!(page.page, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 40);
        assert!(page.items.is_empty());
    }
}
