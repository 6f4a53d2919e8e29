//! Reusable field validators
//!
//! Each validator checks one field and returns the failure as a
//! [`FieldValidationError`] so callers can collect them.

use crate::core::error::FieldValidationError;

/// Validator: text field must contain at least one character
pub fn non_empty(field: &str, value: &str) -> Result<(), FieldValidationError> {
    if value.is_empty() {
        Err(FieldValidationError {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validator: number must not be zero
pub fn non_zero(field: &str, value: i64) -> Result<(), FieldValidationError> {
    if value == 0 {
        Err(FieldValidationError {
            field: field.to_string(),
            message: "must not be zero".to_string(),
        })
    } else {
        Ok(())
    }
}
