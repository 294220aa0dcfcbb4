//! Shared application state.
//!
//! Everything handlers need is carried here and injected through axum's
//! `State` extractor; nothing is global.

use pixwall_core::Config;
use pixwall_db::ImageRepository;
use pixwall_processing::{Thumbnailer, UploadValidator};
use pixwall_storage::LocalStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub repo: ImageRepository,
    pub store: LocalStore,
    pub thumbnailer: Thumbnailer,
    pub validator: UploadValidator,
}

impl AppState {
    pub fn new(config: Config, repo: ImageRepository, store: LocalStore) -> Self {
        let thumbnailer = Thumbnailer::new(config.thumbnail_max_dim);
        let validator = UploadValidator::new(config.max_content_length);
        Self {
            config,
            repo,
            store,
            thumbnailer,
            validator,
        }
    }
}
