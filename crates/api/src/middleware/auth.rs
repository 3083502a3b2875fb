//! Bearer-token extractor.
//!
//! Claims are trusted as-is; a token outlives its user row until it expires.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use kindquest_core::error::CoreError;
use kindquest_core::roles;
use kindquest_core::types::DbId;

use crate::auth::jwt::{validate_token, TokenError};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        roles::is_admin(&self.role)
    }
}

fn unauthorized(msg: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(msg.to_owned()))
}

/// Pulls the raw token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| unauthorized("Authorization header is not valid text"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(unauthorized("Expected a Bearer token")),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = validate_token(token, &state.config.jwt).map_err(|e| match e {
            TokenError::Expired => unauthorized("Token has expired"),
            other => {
                tracing::debug!(error = %other, "Rejected bearer token");
                unauthorized("Invalid token")
            }
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/auth/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let parts = parts_with(Some("bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn basic_auth_is_refused() {
        let parts = parts_with(Some("Basic dXNlcjpwYXNz"));
        assert!(bearer_token(&parts).is_err());
    }

    #[test]
    fn absent_header_is_refused() {
        assert!(bearer_token(&parts_with(None)).is_err());
        assert!(bearer_token(&parts_with(Some("Bearer "))).is_err());
    }
}
