//! Filesystem storage for originals and thumbnails, plus storage naming.

pub mod local;
pub mod naming;

pub use local::{LocalStore, StorageError, StorageResult};
pub use naming::{sanitize_filename, storage_name, NamingError, ALLOWED_EXTENSIONS};
