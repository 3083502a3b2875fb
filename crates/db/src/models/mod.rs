//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches

pub mod achievement;
pub mod city;
pub mod lookup;
pub mod organization;
pub mod progress_update;
pub mod quest;
pub mod record_status;
pub mod region;
pub mod ticket;
pub mod user;
