//! Application setup: configuration validation, database pool,
//! storage directories, router, server.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use pixwall_core::Config;
use pixwall_db::ImageRepository;
use pixwall_storage::LocalStore;

use crate::state::AppState;

/// Build everything the server needs, failing fast on bad config or an
/// unreachable database.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router)> {
    config.validate()?;

    let pool = database::create_pool(&config).await?;
    database::run_migrations(&pool).await?;

    let store = LocalStore::new(config.upload_dir.clone()).await?;
    let repo = ImageRepository::new(pool);

    let state = Arc::new(AppState::new(config, repo, store));
    let router = routes::create_router(state.clone());

    tracing::info!(
        upload_dir = %state.config.upload_dir.display(),
        page_size = state.config.page_size,
        max_content_length = state.config.max_content_length,
        "Application initialized"
    );

    Ok((state, router))
}
