//! Transaction helper for the upload batch commit.

use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres, Transaction};

/// Boxed future borrowing an open transaction for its lifetime.
pub type TxFuture<'t, R> = Pin<Box<dyn Future<Output = Result<R, sqlx::Error>> + Send + 't>>;

/// Run `op` inside a transaction: commit when it succeeds, roll back
/// when it fails. A rollback error is swallowed so the query error that
/// caused it is the one reported.
pub async fn with_transaction<R, F>(pool: &PgPool, op: F) -> Result<R>
where
    F: for<'t> FnOnce(&'t mut Transaction<'_, Postgres>) -> TxFuture<'t, R>,
{
    let mut tx = pool.begin().await.context("Failed to begin transaction")?;

    match op(&mut tx).await {
        Ok(value) => {
            tx.commit().await.context("Failed to commit transaction")?;
            Ok(value)
        }
        Err(query_err) => {
            tx.rollback().await.ok();
            Err(anyhow::Error::from(query_err))
        }
    }
}
