//! Error types for the ripeness pipeline.
//!
//! This module defines the error types that can occur while estimating
//! ripeness from an image, including decode errors, processing errors, and
//! invalid-input errors. It also provides utility constructors for creating
//! these errors with appropriate context.

use thiserror::Error;

/// Enum representing different stages of processing in the ripeness pipeline.
///
/// This enum is used to identify which stage of the pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Error occurred during color-space conversion.
    Colorspace,
    /// Error occurred during Value-channel equalization.
    Equalization,
    /// Error occurred during subject masking.
    Masking,
    /// Error occurred during channel aggregation.
    Aggregation,
    /// Error occurred during classification.
    Classification,
    /// Generic processing error.
    Generic,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Colorspace => write!(f, "color-space conversion"),
            ProcessingStage::Equalization => write!(f, "value equalization"),
            ProcessingStage::Masking => write!(f, "masking"),
            ProcessingStage::Aggregation => write!(f, "aggregation"),
            ProcessingStage::Classification => write!(f, "classification"),
            ProcessingStage::Generic => write!(f, "processing"),
        }
    }
}

/// An opaque error carrying only a message.
///
/// Used as the source of a [`RipenessError::Processing`] error when the
/// failure originates in this crate rather than in an underlying library.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OpaqueError(pub String);

/// Enum representing the errors that can occur in the ripeness pipeline.
///
/// Covers image decoding, stage-tagged processing failures, invalid input,
/// and configuration problems. An empty subject mask is NOT an error: it is
/// reported as the `NoSubjectDetected` outcome by the pipeline.
#[derive(Error, Debug)]
pub enum RipenessError {
    /// Input bytes could not be decoded as any supported image format.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// Image has zero area or an otherwise unusable layout.
    #[error("degenerate input: {message}")]
    DegenerateInput {
        /// A message describing the degenerate input.
        message: String,
    },

    /// Error occurred during processing.
    #[error("{stage} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        stage: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from array shape operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenient result alias for fallible ripeness operations.
pub type RipenessResult<T> = Result<T, RipenessError>;

impl RipenessError {
    /// Creates a RipenessError for a processing failure with an underlying source.
    ///
    /// # Arguments
    ///
    /// * `stage` - The stage of processing where the error occurred.
    /// * `context` - Additional context about the error.
    /// * `error` - The underlying error that caused this error.
    pub fn processing(
        stage: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            stage,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a RipenessError for a processing failure described only by a message.
    ///
    /// # Arguments
    ///
    /// * `stage` - The stage of processing where the error occurred.
    /// * `context` - A message describing the failure.
    pub fn processing_message(stage: ProcessingStage, context: impl Into<String>) -> Self {
        let context = context.into();
        Self::Processing {
            stage,
            source: Box::new(OpaqueError(context.clone())),
            context,
        }
    }

    /// Creates a RipenessError for invalid input.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the invalid input.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a RipenessError for degenerate input (zero area, missing channels).
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the degenerate input.
    pub fn degenerate_input(message: impl Into<String>) -> Self {
        Self::DegenerateInput {
            message: message.into(),
        }
    }

    /// Creates a RipenessError for configuration errors.
    ///
    /// # Arguments
    ///
    /// * `message` - A message describing the configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Implementation of From<image::ImageError> for RipenessError.
///
/// This allows image::ImageError to be automatically converted to RipenessError.
impl From<image::ImageError> for RipenessError {
    fn from(error: image::ImageError) -> Self {
        Self::Decode(error)
    }
}

/// Implementation of From<ConfigError> for RipenessError.
///
/// This allows configuration validation errors to be automatically converted
/// to RipenessError.
impl From<crate::core::config::ConfigError> for RipenessError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_stage_display() {
        assert_eq!(
            ProcessingStage::Colorspace.to_string(),
            "color-space conversion"
        );
        assert_eq!(ProcessingStage::Masking.to_string(), "masking");
        assert_eq!(ProcessingStage::Generic.to_string(), "processing");
    }

    #[test]
    fn test_processing_message_carries_context() {
        let err = RipenessError::processing_message(ProcessingStage::Aggregation, "empty cube");
        assert_eq!(err.to_string(), "aggregation failed: empty cube");
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = crate::core::config::ConfigError::InvalidConfig {
            message: "bad bounds".to_string(),
        };
        let err: RipenessError = config_err.into();
        assert!(matches!(err, RipenessError::Config { .. }));
    }
}
