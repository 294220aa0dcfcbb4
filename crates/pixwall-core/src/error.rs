//! Error types module
//!
//! All errors are unified under the `AppError` enum, which covers database,
//! filesystem, validation, and batch-level upload failures. HTTP-specific
//! rendering lives in the api crate; this module only describes how each
//! variant should be reported.

use std::io;

use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DATABASE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Save failure: {0}")]
    SaveFailure(String),

    #[error("All uploads failed")]
    AllUploadsFailed,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        // Transaction helpers return anyhow; recover the sqlx error when present
        // so pool exhaustion stays a retryable database error.
        match err.downcast::<SqlxError>() {
            Ok(sqlx_err) => AppError::Database(sqlx_err),
            Err(other) => {
                if other
                    .chain()
                    .any(|cause| cause.downcast_ref::<SqlxError>().is_some())
                {
                    // Context-wrapped database error, e.g. from with_transaction.
                    AppError::Database(SqlxError::Protocol(other.to_string()))
                } else {
                    AppError::Internal(other.to_string())
                }
            }
        }
    }
}

/// Static metadata per variant: (http_status, error_code, recoverable, sensitive, log_level).
/// client_message stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::InvalidFilename(_) => (400, "INVALID_FILENAME", false, false, LogLevel::Debug),
        AppError::SaveFailure(_) => (500, "SAVE_FAILURE", true, true, LogLevel::Error),
        AppError::AllUploadsFailed => (500, "ALL_UPLOADS_FAILED", false, false, LogLevel::Warn),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, true, LogLevel::Error),
    }
}

impl AppError {
    /// Error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::InvalidFilename(_) => "InvalidFilename",
            AppError::SaveFailure(_) => "SaveFailure",
            AppError::AllUploadsFailed => "AllUploadsFailed",
            AppError::NotFound(_) => "NotFound",
            AppError::BadRequest(_) => "BadRequest",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Detailed error information including the source chain.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::InvalidFilename(ref msg) => msg.clone(),
            AppError::SaveFailure(_) => "Failed to save uploaded file".to_string(),
            AppError::AllUploadsFailed => "All files failed to upload".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_database() {
        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to access database");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Image not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Image not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_all_uploads_failed() {
        let err = AppError::AllUploadsFailed;
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "ALL_UPLOADS_FAILED");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_pool_timeout_stays_retryable_through_anyhow() {
        let err = AppError::from(anyhow::Error::from(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, AppError::Database(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_invalid_filename_message_passes_through() {
        let err = AppError::InvalidFilename("extension not allowed: exe".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert!(err.client_message().contains("exe"));
        assert!(!err.is_sensitive());
    }
}
