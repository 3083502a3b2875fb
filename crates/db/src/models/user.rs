//! User entity model and DTOs.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// A user row from the `users` table.
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Avatar URLs keyed by size, e.g. `{"small": "...", "large": "..."}`.
    pub avatar_urls: serde_json::Value,
    pub role: String,
    pub level: i32,
    pub experience: i32,
    pub organisation_id: Option<DbId>,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO used after the password has been hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub email: String,
    pub password_hash: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub middle_name: Option<String>,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of `PATCH /users/me`. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub middle_name: Option<String>,
    pub avatar_urls: Option<serde_json::Value>,
    pub organisation_id: Option<DbId>,
}
