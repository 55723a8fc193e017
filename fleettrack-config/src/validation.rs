//! Custom validation functions for configuration.

use validator::ValidationError;

/// Validate that a floating point value is neither NaN nor infinite.
pub fn validate_finite(value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new("must_be_finite"))
    }
}
