//! # Ripegauge
//!
//! A Rust library that estimates fruit ripeness from a single still image by
//! computing average color-channel statistics and comparing them against
//! fixed calibration thresholds. It is a classification heuristic, not a
//! learned model.
//!
//! ## Features
//!
//! - Complete pipeline from uploaded bytes to a structured verdict
//! - Three swappable calibrations: plain RGB, 8-bit HSV, normalized HSV
//! - Brightness-tiered subject masking with median and morphology cleanup
//! - Explicit "no subject detected" outcome instead of spurious guesses
//! - Serde configuration with JSON loading and validation
//!
//! ## Components
//!
//! - **Image Loader**: decode JPEG/PNG bytes, drop alpha, optional fixed-canvas resize
//! - **Color-Space Converter**: RGB to HSV under two non-interchangeable conventions
//! - **Region Masker**: brightness-tiered HSV bounds, median filter, morphological opening
//! - **Channel Aggregator**: per-channel means over masked pixels with an empty-mask guard
//! - **Ripeness Classifier**: ordered first-match-wins rules over the aggregated means
//!
//! ## Modules
//!
//! * [`core`] - Error handling, configuration validation, and the classifier trait
//! * [`domain`] - Ripeness categories, verdicts, and channel statistics
//! * [`models`] - The three classifier calibrations
//! * [`pipeline`] - The end-to-end analysis pipeline
//! * [`processors`] - Conversion, masking, and aggregation stages
//! * [`utils`] - Image decoding and loading utilities
//!
//! ## Quick Start
//!
//! ```rust
//! use ripegauge::prelude::*;
//! use image::{Rgb, RgbImage};
//!
//! # fn main() -> Result<(), RipenessError> {
//! let pipeline = RipenessPipeline::builder()
//!     .variant(PipelineVariant::Rgb)
//!     .build()?;
//!
//! let banana = RgbImage::from_pixel(64, 64, Rgb([230, 210, 60]));
//! match pipeline.analyze_image(&banana)? {
//!     RipenessOutcome::Classified(report) => {
//!         println!("{}: {}", report.label, report.advice);
//!     }
//!     RipenessOutcome::NoSubjectDetected => println!("no fruit found"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## JSON Configuration
//!
//! ```rust
//! use ripegauge::prelude::*;
//!
//! # fn main() -> Result<(), RipenessError> {
//! let config = RipenessPipelineConfig::from_json(r#"
//! {
//!   "variant": "MaskedHsv",
//!   "canvas": [512, 512],
//!   "equalize_value": true
//! }
//! "#)?;
//! let _pipeline = RipenessPipeline::new(config)?;
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod models;

pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use ripegauge::prelude::*;
/// ```
///
/// Included items focus on the most common tasks:
/// - Pipeline assembly (`RipenessPipeline`, `RipenessPipelineBuilder`,
///   `RipenessPipelineConfig`, `PipelineVariant`)
/// - Results (`RipenessOutcome`, `RipenessReport`, `RipenessCategory`)
/// - Essential error types (`RipenessError`, `RipenessResult`)
/// - Basic image loading (`decode_image`, `load_image`, `SourceFormat`)
///
/// For advanced customization (threshold tables, individual stages, the
/// `Classifier` trait), import directly from the respective modules (e.g.
/// `ripegauge::models`, `ripegauge::processors`, `ripegauge::core`).
pub mod prelude {
    // Pipeline (essential)
    pub use crate::pipeline::{
        PipelineVariant, RipenessOutcome, RipenessPipeline, RipenessPipelineBuilder,
        RipenessPipelineConfig, RipenessReport,
    };

    // Domain vocabulary (essential)
    pub use crate::domain::RipenessCategory;

    // Error handling (essential)
    pub use crate::core::{RipenessError, RipenessResult};

    // Image utilities (minimal)
    pub use crate::utils::{decode_image, load_image, SourceFormat};
}
