//! Classifier calibrations for the supported color scales.
//!
//! Each submodule pairs a threshold table with a [`Classifier`](crate::core::Classifier)
//! implementation for one scale. The tables embody three independent,
//! incompatible calibrations; the pipeline selects exactly one at
//! configuration time.
//!
//! # Modules
//!
//! * `rgb` - Plain 0-255 RGB means, three categories
//! * `hsv255` - 8-bit HSV means with harvest windows and display tags
//! * `hsv_norm` - Normalized 0.0-1.0 HSV means

pub mod hsv255;
pub mod hsv_norm;
pub mod rgb;

pub use hsv255::{Hsv255Classifier, Hsv255Thresholds};
pub use hsv_norm::{HsvNormalizedClassifier, HsvNormalizedThresholds};
pub use rgb::{RgbClassifier, RgbThresholds};
