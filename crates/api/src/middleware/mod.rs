//! Request extractors for identity and role checks.

pub mod auth;
pub mod rbac;
