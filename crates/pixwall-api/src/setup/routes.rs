//! Route table and tower layers.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::static_cache_control;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let uploads = ServeDir::new(state.store.upload_dir().to_path_buf());

    Router::new()
        .route("/upload", post(handlers::upload::upload_images))
        .route("/gallery", get(handlers::gallery::gallery))
        .route("/delete_image/{id}", delete(handlers::delete::delete_image))
        .route("/batch_delete", post(handlers::batch::batch_delete))
        .route("/download_urls", post(handlers::export::download_urls))
        .route(
            "/admin/generate_missing_thumbnails",
            get(handlers::maintenance::generate_missing_thumbnails),
        )
        .route("/health", get(handlers::health::health))
        .nest_service("/static/uploads", uploads)
        .layer(axum_middleware::from_fn(static_cache_control))
        .layer(DefaultBodyLimit::max(state.config.max_content_length))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
