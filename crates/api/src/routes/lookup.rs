use axum::routing::{get, post};
use axum::{Extension, Router};
use kindquest_db::models::lookup::LookupKind;

use crate::handlers::lookup;
use crate::state::AppState;

/// Routes for one lookup table, mounted at `/organization-types`,
/// `/help-types` or `/categories`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router(kind: LookupKind) -> Router<AppState> {
    Router::new()
        .route("/", get(lookup::list).post(lookup::create))
        .route(
            "/{id}",
            get(lookup::get_by_id)
                .patch(lookup::update)
                .delete(lookup::delete),
        )
        .layer(Extension(kind))
}

/// Bulk creation for one lookup table.
///
/// ```text
/// POST   /        -> create_bulk (admin only)
/// ```
pub fn bulk_router(kind: LookupKind) -> Router<AppState> {
    Router::new()
        .route("/", post(lookup::create_bulk))
        .layer(Extension(kind))
}
