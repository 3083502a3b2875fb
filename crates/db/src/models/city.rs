//! City entity model and DTOs.

use kindquest_core::coordinates;
use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// A city row from the `cities` table.
///
/// Coordinates are stored as decimal text and serialized as numbers.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: DbId,
    pub name: String,
    #[serde(
        serialize_with = "coordinates::serialize",
        deserialize_with = "coordinates::deserialize"
    )]
    pub latitude: String,
    #[serde(
        serialize_with = "coordinates::serialize",
        deserialize_with = "coordinates::deserialize"
    )]
    pub longitude: String,
    pub region_id: DbId,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a city (also the element type of a bulk request).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCity {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    pub region_id: DbId,
}

/// DTO for updating a city. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCity {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    pub region_id: Option<DbId>,
}

/// Query parameters for `GET /cities`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityListParams {
    pub region_id: Option<DbId>,
}
