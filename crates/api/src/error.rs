use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kindquest_core::error::CoreError;
use kindquest_db::errors::{is_foreign_key_violation, is_unique_violation};
use serde::Serialize;

/// One failed validation rule, addressed by its JSON path
/// (e.g. `name`, `contacts[0].value`, `[2].latitude`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

/// Everything a handler can fail with. Rendered as
/// `{"error", "code", "details"?}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    /// Declarative checks on a request body failed.
    #[error("{} invalid field(s)", .0.len())]
    Validation(Vec<FieldIssue>),

    /// Malformed input that is not tied to a DTO field (uploads, query strings).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Translate a unique violation into `conflict`; other database errors
    /// pass through unchanged.
    pub fn unique_or(err: sqlx::Error, conflict: CoreError) -> Self {
        if is_unique_violation(&err) {
            AppError::Core(conflict)
        } else {
            AppError::Database(err)
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<&'a [FieldIssue]>,
}

const CONCEALED: &str = "An internal error occurred";

fn concealed() -> (StatusCode, &'static str, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", CONCEALED.to_owned())
}

fn core_parts(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Domain invariant broken");
            concealed()
        }
    }
}

/// Services translate expected constraint failures themselves; whatever
/// reaches this point was not anticipated.
fn database_parts(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found".to_owned());
    }
    if is_unique_violation(err) {
        tracing::warn!(error = %err, "Unhandled unique violation");
        return (StatusCode::CONFLICT, "CONFLICT", "Record already exists".to_owned());
    }
    if is_foreign_key_violation(err) {
        tracing::warn!(error = %err, "Unhandled foreign key violation");
        return (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Record is still referenced or references a missing row".to_owned(),
        );
    }
    tracing::error!(error = %err, "Query failed");
    concealed()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => database_parts(err),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "Request validation failed".to_owned(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Request failed");
                concealed()
            }
        };

        let details = match &self {
            AppError::Validation(issues) => Some(issues.as_slice()),
            _ => None,
        };
        (status, Json(ErrorBody { error, code, details })).into_response()
    }
}
