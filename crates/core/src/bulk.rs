//! Batch checks shared by the bulk-create endpoints.
//!
//! A batch is validated completely before anything is written: duplicates
//! inside the request, missing referenced rows and keys already taken in the
//! store are each reported with their own error so callers can tell them
//! apart.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

use crate::error::CoreError;
use crate::types::DbId;

/// Return the first key that occurs more than once, in input order.
pub fn first_duplicate<K, I>(keys: I) -> Option<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut seen = HashSet::new();
    keys.into_iter().find(|k| !seen.insert(k.clone()))
}

/// Reject an empty batch.
pub fn ensure_not_empty<T>(entity: &str, items: &[T]) -> Result<(), CoreError> {
    if items.is_empty() {
        return Err(CoreError::Validation(format!(
            "At least one {entity} is required"
        )));
    }
    Ok(())
}

/// Reject a batch that repeats the same key.
pub fn ensure_unique_in_batch<K, I>(entity: &str, keys: I) -> Result<(), CoreError>
where
    K: Eq + Hash + Clone + Display,
    I: IntoIterator<Item = K>,
{
    match first_duplicate(keys) {
        Some(key) => Err(CoreError::Conflict(format!(
            "Duplicate {entity} '{key}' in request"
        ))),
        None => Ok(()),
    }
}

/// Every requested id must be among the ids the store returned.
pub fn ensure_all_present(
    entity: &'static str,
    requested: &[DbId],
    found: &[DbId],
) -> Result<(), CoreError> {
    let found: HashSet<DbId> = found.iter().copied().collect();
    match requested.iter().find(|id| !found.contains(id)) {
        Some(&id) => Err(CoreError::not_found(entity, id)),
        None => Ok(()),
    }
}

/// The store must not already hold any of the batch keys.
pub fn ensure_none_existing<K: Display>(
    entity: &str,
    field: &str,
    existing: &[K],
) -> Result<(), CoreError> {
    match existing.first() {
        Some(key) => Err(CoreError::already_exists(entity, field, &key.to_string())),
        None => Ok(()),
    }
}

/// Distinct ids in first-seen order, for batched existence queries.
pub fn distinct_ids<I: IntoIterator<Item = DbId>>(ids: I) -> Vec<DbId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn duplicate_names_in_batch_conflict() {
        let result = ensure_unique_in_batch("category", ["A", "B", "A"]);
        assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("'A' in request"));
    }

    #[test]
    fn unique_batch_passes() {
        assert!(ensure_unique_in_batch("category", ["A", "B", "a"]).is_ok());
    }

    #[test]
    fn composite_keys_detect_duplicates() {
        let keys = vec![("Kazan".to_string(), 1), ("Kazan".to_string(), 2)];
        assert!(first_duplicate(keys).is_none());

        let keys = vec![("Kazan".to_string(), 1), ("Kazan".to_string(), 1)];
        assert_eq!(first_duplicate(keys), Some(("Kazan".to_string(), 1)));
    }

    #[test]
    fn missing_reference_is_not_found() {
        let result = ensure_all_present("Region", &[1, 2, 3], &[1, 3]);
        assert_matches!(result, Err(CoreError::NotFound { entity: "Region", id: 2 }));
        assert!(ensure_all_present("Region", &[1, 3], &[3, 1]).is_ok());
    }

    #[test]
    fn existing_key_is_already_exists() {
        let result = ensure_none_existing("Category", "name", &["A".to_string()]);
        assert_matches!(result, Err(CoreError::Conflict(msg)) if msg.contains("already exists"));
        assert!(ensure_none_existing::<String>("Category", "name", &[]).is_ok());
    }

    #[test]
    fn empty_batch_is_rejected() {
        assert_matches!(
            ensure_not_empty::<u8>("city", &[]),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn distinct_ids_keeps_first_seen_order() {
        assert_eq!(distinct_ids([3, 1, 3, 2, 1]), vec![3, 1, 2]);
    }
}
