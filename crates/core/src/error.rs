use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the `NotFound` variant.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// `Conflict` for a unique key that is already taken by a live row.
    pub fn already_exists(entity: &str, field: &str, value: &str) -> Self {
        Self::Conflict(format!("{entity} with {field} '{value}' already exists"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::not_found("Region", 42);
        assert_eq!(err.to_string(), "Entity not found: Region with id 42");
    }

    #[test]
    fn already_exists_message() {
        let err = CoreError::already_exists("Category", "name", "Animals");
        assert_eq!(
            err.to_string(),
            "Conflict: Category with name 'Animals' already exists"
        );
    }
}
