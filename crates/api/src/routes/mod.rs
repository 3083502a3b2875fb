pub mod achievement;
pub mod auth;
pub mod city;
pub mod health;
pub mod lookup;
pub mod organization;
pub mod quest;
pub mod region;
pub mod ticket;
pub mod upload;
pub mod user;

use axum::Router;
use kindquest_db::models::lookup::LookupKind;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth                       register, login, me
/// /users                      public profiles, own profile, achievements, quests
/// /regions                    CRUD (list cached)
/// /cities                     CRUD, bulk (list cached, ?regionId=)
/// /organization-types         CRUD
/// /help-types                 CRUD
/// /categories                 CRUD
/// /organizations              CRUD, bulk, approval, owners, help types,
///                             gallery, progress updates
/// /achievements               CRUD, assignment
/// /quests                     CRUD, join, completion, progress updates
/// /tickets                    own tickets (admins see all)
/// /uploads                    image upload, public URLs
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", user::router())
        .nest("/regions", region::router())
        .nest("/cities", city::router())
        .nest("/organization-types", lookup::router(LookupKind::OrganizationType))
        .nest("/help-types", lookup::router(LookupKind::HelpType))
        .nest("/categories", lookup::router(LookupKind::Category))
        .nest("/organizations", organization::router())
        .nest("/achievements", achievement::router())
        .nest("/quests", quest::router())
        .nest("/tickets", ticket::router())
        .nest("/uploads", upload::router())
}

/// Build the `/api/v2` route tree.
///
/// ```text
/// POST /categories            bulk create (admin only)
/// ```
pub fn api_v2_routes() -> Router<AppState> {
    Router::new().nest("/categories", lookup::bulk_router(LookupKind::Category))
}
