//! Data transfer objects for API requests and responses.

pub mod request;
pub mod response;

use validator::Validate;

use catalog_core::error::AppError;

/// Run a DTO's declarative rules, turning failures into a validation error.
pub fn validated<T: Validate>(body: T) -> Result<T, AppError> {
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))?;
    Ok(body)
}
