//! Soft-delete lifecycle shared by every entity table.

use serde::{Deserialize, Serialize};

/// Lifecycle of an entity row. Rows move `Created -> Deleted` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "record_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Created,
    Deleted,
}

/// Predicate every read query appends to hide soft-deleted rows.
pub const LIVE: &str = "record_status <> 'DELETED'";

/// [`LIVE`] qualified with a table alias, for joins.
pub fn live(alias: &str) -> String {
    format!("{alias}.{LIVE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_filter_excludes_deleted_label() {
        let deleted = serde_json::to_value(RecordStatus::Deleted).unwrap();
        assert!(LIVE.contains(deleted.as_str().unwrap()));
        assert_eq!(live("o"), "o.record_status <> 'DELETED'");
    }

    #[test]
    fn serializes_as_screaming_case() {
        let json = serde_json::to_value(RecordStatus::Created).unwrap();
        assert_eq!(json, "CREATED");
    }
}
