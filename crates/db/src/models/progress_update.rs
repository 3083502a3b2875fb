//! Progress posts attached to quests and organizations.
//!
//! Both parents share one row shape; [`UpdateParent`] selects the table.

use kindquest_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::record_status::RecordStatus;

/// Maximum number of photos on a single progress post.
pub const MAX_PHOTOS: usize = 5;

/// Entity a progress post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateParent {
    Quest,
    Organization,
}

impl UpdateParent {
    pub fn table(self) -> &'static str {
        match self {
            UpdateParent::Quest => "quest_updates",
            UpdateParent::Organization => "organization_updates",
        }
    }

    pub fn parent_column(self) -> &'static str {
        match self {
            UpdateParent::Quest => "quest_id",
            UpdateParent::Organization => "organization_id",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            UpdateParent::Quest => "QuestUpdate",
            UpdateParent::Organization => "OrganizationUpdate",
        }
    }
}

/// A row from `quest_updates` or `organization_updates`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub id: DbId,
    pub parent_id: DbId,
    pub title: String,
    pub text: String,
    pub photos: Vec<String>,
    pub record_status: RecordStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a progress update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProgressUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
    #[serde(default)]
    #[validate(length(max = 5))]
    pub photos: Vec<String>,
}

/// DTO for editing a progress update. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressUpdate {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub text: Option<String>,
    #[validate(length(max = 5))]
    pub photos: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn six_photos_are_rejected() {
        let post = CreateProgressUpdate {
            title: "Week 1".into(),
            text: "Planted trees".into(),
            photos: (0..=MAX_PHOTOS).map(|i| format!("p/{i}.jpg")).collect(),
        };
        let errors = post.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("photos"));
    }

    #[test]
    fn five_photos_are_accepted() {
        let post = CreateProgressUpdate {
            title: "Week 1".into(),
            text: "Planted trees".into(),
            photos: (0..MAX_PHOTOS).map(|i| format!("p/{i}.jpg")).collect(),
        };
        assert!(post.validate().is_ok());
    }

    #[test]
    fn tables_per_parent() {
        assert_eq!(UpdateParent::Quest.table(), "quest_updates");
        assert_eq!(UpdateParent::Organization.parent_column(), "organization_id");
    }
}
