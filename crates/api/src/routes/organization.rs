use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::{Extension, Router};
use kindquest_core::storage_keys::MAX_UPLOAD_BYTES;
use kindquest_db::models::progress_update::UpdateParent;

use crate::handlers::{organization, progress_update};
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// GET    /?cityId=&organizationTypeId=&helpTypeId=  -> list
/// POST   /                                          -> create
/// POST   /bulk                                      -> create_bulk (admin only)
/// GET    /{id}                                      -> get_by_id
/// PATCH  /{id}                                      -> update (owner)
/// DELETE /{id}                                      -> delete (owner)
/// PATCH  /{id}/approve                              -> approve (admin only)
/// POST   /{id}/owners/{user_id}                     -> add_owner (owner)
/// DELETE /{id}/owners/{user_id}                     -> remove_owner (owner)
/// POST   /{id}/help-types/{help_type_id}            -> add_help_type (owner)
/// DELETE /{id}/help-types/{help_type_id}            -> remove_help_type (owner)
/// POST   /{id}/gallery                              -> upload_gallery_image (owner, multipart)
/// PUT    /{id}/gallery                              -> replace_gallery (owner)
/// GET    /{id}/updates                              -> progress_update::list
/// POST   /{id}/updates                              -> progress_update::create (owner)
/// PATCH  /{id}/updates/{update_id}                  -> progress_update::update (owner)
/// DELETE /{id}/updates/{update_id}                  -> progress_update::delete (owner)
/// ```
pub fn router() -> Router<AppState> {
    let update_routes = Router::new()
        .route("/", get(progress_update::list).post(progress_update::create))
        .route(
            "/{update_id}",
            patch(progress_update::update).delete(progress_update::delete),
        )
        .layer(Extension(UpdateParent::Organization));

    Router::new()
        .route("/", get(organization::list).post(organization::create))
        .route("/bulk", post(organization::create_bulk))
        .route(
            "/{id}",
            get(organization::get_by_id)
                .patch(organization::update)
                .delete(organization::delete),
        )
        .route("/{id}/approve", patch(organization::approve))
        .route(
            "/{id}/owners/{user_id}",
            post(organization::add_owner).delete(organization::remove_owner),
        )
        .route(
            "/{id}/help-types/{help_type_id}",
            post(organization::add_help_type).delete(organization::remove_help_type),
        )
        .route(
            "/{id}/gallery",
            post(organization::upload_gallery_image)
                .put(organization::replace_gallery)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .nest("/{id}/updates", update_routes)
}
