//! Region entity model and DTOs.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// A region row from the `regions` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: DbId,
    pub name: String,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new region.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegion {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for updating an existing region. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRegion {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
