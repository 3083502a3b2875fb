use axum::routing::{get, patch, post};
use axum::{Extension, Router};
use kindquest_db::models::progress_update::UpdateParent;

use crate::handlers::{progress_update, quest};
use crate::state::AppState;

/// Routes mounted at `/quests`.
///
/// ```text
/// GET    /?cityId=&categoryId=&status=&ownerId=   -> list
/// POST   /                                        -> create
/// GET    /{id}                                    -> get_by_id
/// PATCH  /{id}                                    -> update (owner)
/// DELETE /{id}                                    -> delete (owner)
/// POST   /{id}/join                               -> join
/// POST   /{id}/participants/{user_id}/complete    -> complete (owner)
/// GET    /{id}/updates                            -> progress_update::list
/// POST   /{id}/updates                            -> progress_update::create (owner)
/// PATCH  /{id}/updates/{update_id}                -> progress_update::update (owner)
/// DELETE /{id}/updates/{update_id}                -> progress_update::delete (owner)
/// ```
pub fn router() -> Router<AppState> {
    let update_routes = Router::new()
        .route("/", get(progress_update::list).post(progress_update::create))
        .route(
            "/{update_id}",
            patch(progress_update::update).delete(progress_update::delete),
        )
        .layer(Extension(UpdateParent::Quest));

    Router::new()
        .route("/", get(quest::list).post(quest::create))
        .route(
            "/{id}",
            get(quest::get_by_id).patch(quest::update).delete(quest::delete),
        )
        .route("/{id}/join", post(quest::join))
        .route(
            "/{id}/participants/{user_id}/complete",
            post(quest::complete),
        )
        .nest("/{id}/updates", update_routes)
}
