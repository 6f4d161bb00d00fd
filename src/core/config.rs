//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
///
/// This enum represents the errors that can occur when validating the
/// threshold tables and pipeline options.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that validation failed.
    #[error("validation failed: {message}")]
    ValidationFailed { message: String },
}

/// A trait for validating configuration parameters.
///
/// This trait provides methods for validating the configuration parameters
/// used in the ripeness pipeline, such as threshold tables, channel bounds,
/// and canvas dimensions. Reusable checks are provided as default methods.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// This method should be implemented by types that need to validate their configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    ///
    /// This method should be implemented by types that have default configuration values.
    ///
    /// # Returns
    ///
    /// The default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates that a threshold value is finite and lies within a range (inclusive).
    ///
    /// # Arguments
    ///
    /// * `value` - The value to validate.
    /// * `min` - The minimum allowed value.
    /// * `max` - The maximum allowed value.
    /// * `name` - The parameter name used in error messages.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_threshold(
        &self,
        value: f32,
        min: f32,
        max: f32,
        name: &str,
    ) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::ValidationFailed {
                message: format!("threshold '{}' must be finite, got {}", name, value),
            });
        }
        if value < min || value > max {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "threshold '{}' must be in range [{}, {}], got {}",
                    name, min, max, value
                ),
            });
        }
        Ok(())
    }

    /// Validates that a lower threshold is strictly below an upper threshold.
    ///
    /// # Arguments
    ///
    /// * `lower` - The lower threshold.
    /// * `upper` - The upper threshold.
    /// * `name` - The pair name used in error messages.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_ordered(&self, lower: f32, upper: f32, name: &str) -> Result<(), ConfigError> {
        if lower >= upper {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "'{}' bounds must satisfy lower < upper, got {} >= {}",
                    name, lower, upper
                ),
            });
        }
        Ok(())
    }

    /// Validates image dimensions.
    ///
    /// This method checks that both width and height are greater than 0.
    ///
    /// # Arguments
    ///
    /// * `width` - The image width to validate.
    /// * `height` - The image height to validate.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::ValidationFailed {
                message: format!("image dimensions must be non-zero, got {}x{}", width, height),
            });
        }
        Ok(())
    }
}

/// Extension trait that validates a configuration and wraps failures in a
/// [`RipenessError`](crate::core::RipenessError).
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration, converting any ConfigError into a RipenessError.
    fn validate_and_wrap(self) -> Result<Self, crate::core::RipenessError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

impl<T: ConfigValidator> ConfigValidatorExt for T {}
