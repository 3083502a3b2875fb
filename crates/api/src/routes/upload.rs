use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use kindquest_core::storage_keys::MAX_UPLOAD_BYTES;

use crate::handlers::upload;
use crate::state::AppState;

/// Routes mounted at `/uploads`.
///
/// ```text
/// POST   /        -> upload (multipart)
/// POST   /urls    -> public_urls
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/urls", post(upload::public_urls))
}
