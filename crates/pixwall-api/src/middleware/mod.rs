//! Response-header middleware.

use axum::{
    extract::Request,
    http::header::{HeaderValue, CACHE_CONTROL, VARY},
    middleware::Next,
    response::Response,
};

/// Cache-control tiers for static assets. Storage names are unique per
/// upload, so an original never changes under a given URL; thumbnails
/// can be regenerated; css/js turn over with deploys.
pub async fn static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    let directive = if path.starts_with("/static/uploads/thumbnails/") {
        Some("public, max-age=2592000")
    } else if path.starts_with("/static/uploads/") {
        Some("public, max-age=31536000, immutable")
    } else if path.starts_with("/static/css/") || path.starts_with("/static/js/") {
        Some("public, max-age=604800")
    } else {
        None
    };

    if let Some(directive) = directive {
        if response.status().is_success() {
            response
                .headers_mut()
                .insert(CACHE_CONTROL, HeaderValue::from_static(directive));
            response
                .headers_mut()
                .insert(VARY, HeaderValue::from_static("Accept-Encoding"));
        }
    }

    response
}
