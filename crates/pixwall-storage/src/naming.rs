//! Storage naming: sanitization and collision-resistant storage names.
//!
//! Untrusted upload names are sanitized to a display-safe form that keeps
//! the original extension, then prefixed with a random 128-bit hex token
//! to form the unique on-disk storage name.

use uuid::Uuid;

/// Extensions accepted for upload, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("Empty filename")]
    Empty,

    #[error("Missing file extension: {0}")]
    MissingExtension(String),

    #[error("File extension not allowed: {extension}")]
    DisallowedExtension { extension: String },
}

/// Lowercase extension of `filename`, if it has one.
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Check the allow-list before any I/O happens.
pub fn validate_extension(filename: &str) -> Result<String, NamingError> {
    if filename.trim().is_empty() {
        return Err(NamingError::Empty);
    }
    let ext = extension_of(filename)
        .ok_or_else(|| NamingError::MissingExtension(filename.to_string()))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(NamingError::DisallowedExtension { extension: ext });
    }
    Ok(ext)
}

/// Sanitize an untrusted filename into a display-safe form.
///
/// Only the final path component is kept, so directory escapes are
/// impossible. Whitespace becomes `_`; anything outside ASCII
/// alphanumerics, `.`, `-` and `_` is dropped; leading/trailing dots and
/// underscores are trimmed so the result can never be a dotfile or a
/// relative traversal component.
pub fn sanitize_filename(filename: &str) -> Result<String, NamingError> {
    let last_component = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let mut sanitized = String::with_capacity(last_component.len());
    for c in last_component.chars() {
        if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            sanitized.push(c);
        } else if c.is_whitespace() {
            sanitized.push('_');
        }
        // Control characters and anything else are dropped.
    }

    let sanitized = sanitized.trim_matches(['.', '_']).to_string();
    if sanitized.is_empty() {
        return Err(NamingError::Empty);
    }
    Ok(sanitized)
}

/// Derive the unique storage name for a sanitized filename: a random
/// 32-hex prefix, a separator, then the sanitized name. Collisions are
/// negligible (128 random bits per upload).
pub fn storage_name(sanitized: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitized)
}

/// Short random suffix for non-record artifacts (e.g. URL exports).
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}
