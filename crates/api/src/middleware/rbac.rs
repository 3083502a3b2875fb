//! Admin gate for lookup tables, approvals and bulk imports.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kindquest_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An [`AuthUser`] known to hold the admin role. Anyone else gets 403.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await? {
            user if user.is_admin() => Ok(Self(user)),
            user => {
                tracing::warn!(user_id = user.user_id, "Non-admin hit an admin route");
                Err(CoreError::Forbidden("Admin role required".into()).into())
            }
        }
    }
}
