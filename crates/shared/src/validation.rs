//! Common validation utilities.

use validator::ValidationError;

/// Validates that a string contains at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Validates a username: 3-32 characters of `[A-Za-z0-9_.-]`.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len_ok = (3..=32).contains(&username.chars().count());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));

    if len_ok && chars_ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("Username must be 3-32 characters of letters, digits, '_', '.' or '-'".into());
        Err(err)
    }
}

/// Validates an object-store id: non-blank, no `/`, and not a dot segment.
pub fn validate_storage_id(storage_id: &str) -> Result<(), ValidationError> {
    let ok = !storage_id.trim().is_empty()
        && !matches!(storage_id, "." | "..")
        && !storage_id.contains('/');

    if ok {
        Ok(())
    } else {
        let mut err = ValidationError::new("storage_id_format");
        err.message = Some("Invalid storage id".into());
        Err(err)
    }
}
