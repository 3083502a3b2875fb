//! Entity services: existence, uniqueness and ownership checks in front of
//! the repositories.
//!
//! Handlers validate the request body, then call exactly one service
//! function. Services take `&AppState` so they can reach the cache, object
//! storage, the chat service and the queue alongside the pool.

pub mod achievement;
pub mod auth;
pub mod city;
pub mod lookup;
pub mod organization;
pub mod progress_update;
pub mod quest;
pub mod region;
pub mod ticket;
pub mod upload;
pub mod user;

use kindquest_core::error::CoreError;
use kindquest_core::types::DbId;

use crate::error::{AppError, AppResult};

/// Unwrap a live row or fail with `NotFound`.
pub(crate) fn found<T>(row: Option<T>, entity: &'static str, id: DbId) -> AppResult<T> {
    row.ok_or(AppError::Core(CoreError::not_found(entity, id)))
}

/// Turn a soft-delete result into `NotFound` when no live row matched.
pub(crate) fn removed(deleted: bool, entity: &'static str, id: DbId) -> AppResult<()> {
    if deleted {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::not_found(entity, id)))
    }
}

pub(crate) fn forbidden(message: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(message.to_string()))
}
