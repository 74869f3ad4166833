//! Mapping of database errors onto store errors.

use domain::store::StoreError;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

/// Classifies a `sqlx` error.
///
/// Unique violations and serialization failures become `Conflict`: the
/// transaction lost a race and the whole operation may be retried.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return StoreError::Conflict(format!(
                    "Duplicate value violates {}",
                    db_err.constraint().unwrap_or("a unique constraint")
                ));
            }
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => {
                return StoreError::Conflict(
                    "Concurrent update detected, please retry".to_string(),
                );
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return StoreError::Missing(format!(
                    "Referenced record does not exist ({})",
                    db_err.constraint().unwrap_or("foreign key")
                ));
            }
            _ => {}
        }
    }
    StoreError::Database(err.to_string())
}
