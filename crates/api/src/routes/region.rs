use axum::routing::get;
use axum::Router;

use crate::handlers::region;
use crate::state::AppState;

/// Routes mounted at `/regions`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PATCH  /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(region::list).post(region::create))
        .route(
            "/{id}",
            get(region::get_by_id)
                .patch(region::update)
                .delete(region::delete),
        )
}
