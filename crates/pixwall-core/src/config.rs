//! Configuration module
//!
//! Environment-driven configuration for the gallery service. A single
//! `Config` is constructed at startup, validated, and passed explicitly
//! into the application state; nothing reads the environment afterwards.

use std::env;
use std::path::PathBuf;

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;
// Connections are recycled well before typical server-side idle kills.
const DEFAULT_DB_IDLE_TIMEOUT_SECS: u64 = 280;
const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;
const DEFAULT_PAGE_SIZE: u32 = 18;
const DEFAULT_THUMBNAIL_MAX_DIM: u32 = 300;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    /// Root directory for stored originals; thumbnails live in a
    /// `thumbnails/` subdirectory underneath it.
    pub upload_dir: PathBuf,
    /// External base URL used to build public file URLs
    /// (e.g. "https://pics.example.com").
    pub public_base_url: String,
    /// Request body cap in bytes.
    pub max_content_length: usize,
    /// Gallery page size.
    pub page_size: u32,
    /// Thumbnail bounding box (square), in pixels.
    pub thumbnail_max_dim: u32,
    /// API key required by the maintenance endpoints. None disables them.
    pub admin_api_key: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let upload_dir = env::var("PIXWALL_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static/uploads"));

        let public_base_url = env::var("PIXWALL_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        Ok(Config {
            server_port: env_or("PIXWALL_PORT", DEFAULT_SERVER_PORT),
            database_url,
            db_max_connections: env_or("PIXWALL_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            db_acquire_timeout_secs: env_or(
                "PIXWALL_DB_ACQUIRE_TIMEOUT_SECS",
                DEFAULT_DB_ACQUIRE_TIMEOUT_SECS,
            ),
            db_idle_timeout_secs: env_or(
                "PIXWALL_DB_IDLE_TIMEOUT_SECS",
                DEFAULT_DB_IDLE_TIMEOUT_SECS,
            ),
            upload_dir,
            public_base_url,
            max_content_length: env_or("PIXWALL_MAX_CONTENT_LENGTH", DEFAULT_MAX_CONTENT_LENGTH),
            page_size: env_or("PIXWALL_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            thumbnail_max_dim: env_or("PIXWALL_THUMBNAIL_MAX_DIM", DEFAULT_THUMBNAIL_MAX_DIM),
            admin_api_key: env::var("PIXWALL_ADMIN_API_KEY").ok().filter(|k| !k.is_empty()),
        })
    }

    /// Fail-fast sanity checks run before the server starts.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.public_base_url.ends_with('/') {
            anyhow::bail!("PIXWALL_PUBLIC_BASE_URL must not end with a slash");
        }
        if self.page_size == 0 {
            anyhow::bail!("PIXWALL_PAGE_SIZE must be at least 1");
        }
        if self.thumbnail_max_dim == 0 {
            anyhow::bail!("PIXWALL_THUMBNAIL_MAX_DIM must be at least 1");
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("PIXWALL_DB_MAX_CONNECTIONS must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            server_port: 5000,
            database_url: "postgres://localhost/pixwall".to_string(),
            db_max_connections: 5,
            db_acquire_timeout_secs: 30,
            db_idle_timeout_secs: 280,
            upload_dir: PathBuf::from("static/uploads"),
            public_base_url: "http://localhost:5000".to_string(),
            max_content_length: 16 * 1024 * 1024,
            page_size: 18,
            thumbnail_max_dim: 300,
            admin_api_key: None,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let mut config = test_config();
        config.public_base_url = "http://localhost:5000/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = test_config();
        config.page_size = 0;
        assert!(config.validate().is_err());
    }
}
