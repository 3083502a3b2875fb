use axum::routing::{get, post};
use axum::Router;

use crate::handlers::achievement;
use crate::state::AppState;

/// Routes mounted at `/achievements`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PATCH  /{id}                    -> update
/// DELETE /{id}                    -> delete
/// POST   /{id}/assign/{user_id}   -> assign (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(achievement::list).post(achievement::create))
        .route(
            "/{id}",
            get(achievement::get_by_id)
                .patch(achievement::update)
                .delete(achievement::delete),
        )
        .route("/{id}/assign/{user_id}", post(achievement::assign))
}
