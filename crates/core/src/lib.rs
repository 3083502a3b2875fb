//! Pure domain logic for the KindQuest platform.
//!
//! Nothing in this crate touches the database, the network or the clock
//! beyond `chrono::Utc::now`; everything here is unit-testable in isolation.

pub mod bulk;
pub mod cache_keys;
pub mod coordinates;
pub mod error;
pub mod experience;
pub mod roles;
pub mod storage_keys;
pub mod types;
