//! Input checks that run before any change tracking.
//!
//! Lengths are counted in characters.

use catalog_core::error::AppError;
use catalog_core::result::AppResult;

/// Reject a blank or over-long required text value.
pub fn require_text(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    check_length(field, value, max)
}

/// Reject an over-long text value.
pub fn check_length(field: &str, value: &str, max: usize) -> AppResult<()> {
    let actual = value.chars().count();
    if actual > max {
        return Err(AppError::too_long(field, actual, max));
    }
    Ok(())
}

/// [`check_length`] for an optional value.
pub fn check_optional_length(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(value) => check_length(field, value, max),
        None => Ok(()),
    }
}
