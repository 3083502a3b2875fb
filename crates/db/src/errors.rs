//! Helpers for inspecting and logging driver errors at the repository
//! boundary.

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Whether the error is a unique-constraint violation reported by the store.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION))
}

/// Whether the error is a foreign-key violation reported by the store.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

/// Log a failed query with its operation name and identifying parameters.
///
/// Constraint violations are expected outcomes that services translate, so
/// they are logged at `warn`; everything else is an `error`.
pub fn log_db_error(operation: &'static str, params: &str, err: &sqlx::Error) {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
            let constraint = db.constraint().unwrap_or("");
            if is_unique_violation(err) || is_foreign_key_violation(err) {
                tracing::warn!(
                    operation,
                    params,
                    code = %code,
                    constraint,
                    error = %db,
                    "Constraint violation"
                );
            } else {
                tracing::error!(
                    operation,
                    params,
                    code = %code,
                    constraint,
                    error = %db,
                    "Database query failed"
                );
            }
        }
        other => {
            tracing::error!(operation, params, error = %other, "Database query failed");
        }
    }
}
