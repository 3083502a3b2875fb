//! Simple `{id, name}` lookup entities: organization types, help types and
//! categories share one row shape and one repository.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// Which lookup table a [`Lookup`] row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    OrganizationType,
    HelpType,
    Category,
}

impl LookupKind {
    pub fn table(self) -> &'static str {
        match self {
            LookupKind::OrganizationType => "organization_types",
            LookupKind::HelpType => "help_types",
            LookupKind::Category => "categories",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            LookupKind::OrganizationType => "OrganizationType",
            LookupKind::HelpType => "HelpType",
            LookupKind::Category => "Category",
        }
    }
}

/// A row from one of the lookup tables.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    pub id: DbId,
    pub name: String,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a lookup row (also the bulk element type).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLookup {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// DTO for renaming a lookup row.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLookup {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
}
