use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::ticket;
use crate::state::AppState;

/// Routes mounted at `/tickets`. All require auth.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// DELETE /{id}            -> delete
/// PATCH  /{id}/resolve    -> resolve
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ticket::list).post(ticket::create))
        .route("/{id}", get(ticket::get_by_id).delete(ticket::delete))
        .route("/{id}/resolve", patch(ticket::resolve))
}
