//! Image repository.
//!
//! All queries are runtime-checked (`sqlx::query_as`) so the crate builds
//! without a live database. Ids are assigned by the `images` table's
//! BIGSERIAL on insert, which is why staged uploads only become
//! `ImageRecord`s inside the batch transaction.

use pixwall_core::models::{ImageRecord, NewImage};
use pixwall_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};

const SELECT_COLUMNS: &str =
    "id, filename, original_filename, upload_date, filesize, filetype";

#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert all staged records within the caller's transaction, returning
    /// them with their database-assigned ids in insertion order.
    #[tracing::instrument(skip(self, tx, staged), fields(db.table = "images", db.operation = "insert", count = staged.len()))]
    pub async fn insert_batch_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        staged: &[NewImage],
    ) -> Result<Vec<ImageRecord>, sqlx::Error> {
        let sql = format!(
            "INSERT INTO images (filename, original_filename, upload_date, filesize, filetype) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SELECT_COLUMNS
        );

        let mut records = Vec::with_capacity(staged.len());
        for image in staged {
            let record: ImageRecord = sqlx::query_as(&sql)
                .bind(&image.filename)
                .bind(&image.original_filename)
                .bind(image.upload_date)
                .bind(image.filesize)
                .bind(&image.filetype)
                .fetch_one(&mut **tx)
                .await?;
            records.push(record);
        }
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    pub async fn get(&self, id: i64) -> Result<Option<ImageRecord>, AppError> {
        let sql = format!("SELECT {} FROM images WHERE id = $1", SELECT_COLUMNS);
        let record = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    /// One gallery page, newest first, plus the total record count.
    /// `page` is 1-based; pages past the end yield an empty slice.
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    pub async fn list_page(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<ImageRecord>, i64), AppError> {
        let offset = i64::from(page.saturating_sub(1)) * i64::from(per_page);

        let sql = format!(
            "SELECT {} FROM images ORDER BY upload_date DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        );
        let records: Vec<ImageRecord> = sqlx::query_as(&sql)
            .bind(i64::from(per_page))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM images")
            .fetch_one(&self.pool)
            .await?;

        Ok((records, total))
    }

    /// Records matching `ids`, in the store's natural return order.
    #[tracing::instrument(skip(self, ids), fields(db.table = "images", db.operation = "select", count = ids.len()))]
    pub async fn get_by_ids(&self, ids: &[i64]) -> Result<Vec<ImageRecord>, AppError> {
        let sql = format!("SELECT {} FROM images WHERE id = ANY($1)", SELECT_COLUMNS);
        let records = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    /// Every record; used by the thumbnail backfill sweep.
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "select"))]
    pub async fn list_all(&self) -> Result<Vec<ImageRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM images ORDER BY upload_date DESC",
            SELECT_COLUMNS
        );
        let records = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(records)
    }

    /// Delete one row immediately (single-item delete path). Returns the
    /// number of rows removed (0 when the id was already gone).
    #[tracing::instrument(skip(self), fields(db.table = "images", db.operation = "delete"))]
    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete many rows in one statement (batch delete path: all row
    /// removals land atomically after the per-file work is done).
    #[tracing::instrument(skip(self, ids), fields(db.table = "images", db.operation = "delete", count = ids.len()))]
    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM images WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
