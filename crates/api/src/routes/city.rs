use axum::routing::{get, post};
use axum::Router;

use crate::handlers::city;
use crate::state::AppState;

/// Routes mounted at `/cities`.
///
/// ```text
/// GET    /?regionId=  -> list
/// POST   /            -> create
/// POST   /bulk        -> create_bulk (admin only)
/// GET    /{id}        -> get_by_id
/// PATCH  /{id}        -> update
/// DELETE /{id}        -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(city::list).post(city::create))
        .route("/bulk", post(city::create_bulk))
        .route(
            "/{id}",
            get(city::get_by_id).patch(city::update).delete(city::delete),
        )
}
