//! KindQuest API server library.
//!
//! Exposes the building blocks (config, state, error handling, services,
//! routes) so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;
