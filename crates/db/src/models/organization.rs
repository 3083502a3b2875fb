//! Organization entity model and DTOs.

use kindquest_core::coordinates;
use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use validator::Validate;

use crate::models::lookup::Lookup;
use crate::models::record_status::RecordStatus;

/// A named contact channel (`{"name": "phone", "value": "+7..."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Contact {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 500))]
    pub value: String,
}

/// An organization row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub city_id: DbId,
    pub organization_type_id: DbId,
    #[serde(serialize_with = "coordinates::serialize_opt")]
    pub latitude: Option<String>,
    #[serde(serialize_with = "coordinates::serialize_opt")]
    pub longitude: Option<String>,
    pub summary: String,
    pub mission: String,
    pub description: String,
    pub goals: Vec<String>,
    pub needs: Vec<String>,
    pub address: String,
    pub contacts: Json<Vec<Contact>>,
    /// Object-storage keys of gallery images.
    pub gallery: Vec<String>,
    pub is_approved: bool,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an organization (also the bulk element type).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganization {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub city_id: DbId,
    pub organization_type_id: DbId,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub summary: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub mission: String,
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub address: String,
    #[serde(default)]
    #[validate(nested)]
    pub contacts: Vec<Contact>,
    /// Help types attached on creation.
    #[serde(default)]
    pub help_type_ids: Vec<DbId>,
}

/// DTO for updating an organization. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganization {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub city_id: Option<DbId>,
    pub organization_type_id: Option<DbId>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(length(max = 1000))]
    pub summary: Option<String>,
    #[validate(length(max = 5000))]
    pub mission: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    pub goals: Option<Vec<String>>,
    pub needs: Option<Vec<String>>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(nested)]
    pub contacts: Option<Vec<Contact>>,
}

/// Query parameters for `GET /organizations`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationListParams {
    pub city_id: Option<DbId>,
    pub organization_type_id: Option<DbId>,
    pub help_type_id: Option<DbId>,
}

/// Body of `PATCH /organizations/{id}/approve`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveOrganization {
    pub is_approved: bool,
}

/// Body of `PUT /organizations/{id}/gallery`: the full new list of keys.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceGallery {
    #[validate(length(max = 50))]
    pub keys: Vec<String>,
}

/// An organization with its associations, returned by `GET /organizations/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: Organization,
    pub help_types: Vec<Lookup>,
    pub owner_ids: Vec<DbId>,
    pub gallery_urls: Vec<String>,
}
