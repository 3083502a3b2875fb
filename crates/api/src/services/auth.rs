//! Registration, login and token issuance.

use kindquest_core::error::CoreError;
use kindquest_db::models::user::{CreateUser, LoginRequest, RegisterRequest, User};
use kindquest_db::repositories::UserRepo;
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Returned by register and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: User,
}

fn issue(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to sign token: {e}")))?;
    Ok(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.ttl_secs(),
        user,
    })
}

fn email_taken(email: &str) -> CoreError {
    CoreError::already_exists("User", "email", email)
}

pub async fn register(state: &AppState, input: &RegisterRequest) -> AppResult<AuthResponse> {
    let email = input.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(email_taken(&email).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Failed to hash password: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            middle_name: input.middle_name.clone(),
            email: email.clone(),
            password_hash,
        },
    )
    .await
    .map_err(|e| AppError::unique_or(e, email_taken(&email)))?;

    tracing::info!(user_id = user.id, "User registered");
    issue(state, user)
}

/// Unknown emails and wrong passwords produce the same error.
pub async fn login(state: &AppState, input: &LoginRequest) -> AppResult<AuthResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let email = input.email.trim().to_lowercase();
    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid)?;

    let matches = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {e}")))?;
    if !matches {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");
    issue(state, user)
}
