//! Pixel processing stages of the ripeness pipeline.
//!
//! This module provides the stages between image decoding and
//! classification: color-space conversion, brightness normalization, subject
//! masking, and masked channel aggregation.
//!
//! # Modules
//!
//! * `aggregate` - Per-channel means over masked pixels
//! * `colorspace` - RGB to HSV conversion and Value-channel equalization
//! * `mask` - Brightness-tiered subject masking with median/morphology cleanup
//! * `types` - The pixel cube and conversion conventions

pub mod aggregate;
pub mod colorspace;
pub mod mask;
pub mod types;

pub use aggregate::masked_channel_means;
pub use colorspace::{equalize_value, ColorSpaceConverter};
pub use mask::{morphological_open, HsvBounds, MaskTierTable, SubjectMask, SubjectMasker};
pub use types::{ColorCube, HsvConvention};
