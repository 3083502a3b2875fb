use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// PATCH  /me                  -> update_me
/// DELETE /me                  -> delete_me
/// GET    /{id}                -> get_by_id
/// GET    /{id}/achievements   -> achievements
/// GET    /{id}/quests         -> quests
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", patch(user::update_me).delete(user::delete_me))
        .route("/{id}", get(user::get_by_id))
        .route("/{id}/achievements", get(user::achievements))
        .route("/{id}/quests", get(user::quests))
}
