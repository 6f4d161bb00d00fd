//! The ripeness analysis pipeline.
//!
//! This module provides the main pipeline implementation that combines the
//! processing stages — decoding, color-space conversion, subject masking,
//! channel aggregation, and rule-based classification — into a single
//! synchronous analysis of one image.
//!
//! Each analysis is an independent, stateless computation: the pipeline
//! holds only immutable configuration, so one instance can serve concurrent
//! callers without shared mutable state.

mod config;
mod result;

pub use config::{PipelineVariant, RipenessPipelineConfig};
pub use result::{RipenessOutcome, RipenessReport};

use crate::core::config::ConfigValidator;
use crate::core::errors::RipenessError;
use crate::core::traits::Classifier;
use crate::models::{Hsv255Classifier, HsvNormalizedClassifier, RgbClassifier};
use crate::processors::{
    equalize_value, masked_channel_means, ColorCube, ColorSpaceConverter, HsvConvention,
    MaskTierTable, SubjectMask, SubjectMasker,
};
use crate::utils::{decode_image, resize_to_canvas, SourceFormat};
use image::RgbImage;
use tracing::{debug, warn};

/// The color-statistics ripeness pipeline.
///
/// Data flows strictly forward: loader, converter, masker, aggregator,
/// classifier. The variant (and with it the classifier calibration) is fixed
/// at construction; scales are never mixed mid-pipeline.
pub struct RipenessPipeline {
    config: RipenessPipelineConfig,
    classifier: Box<dyn Classifier + Send + Sync>,
    masker: SubjectMasker,
}

impl std::fmt::Debug for RipenessPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RipenessPipeline")
            .field("config", &self.config)
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

impl RipenessPipeline {
    /// Creates a pipeline from a validated configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - The pipeline configuration.
    ///
    /// # Returns
    ///
    /// The pipeline, or a `Config` error if validation fails.
    pub fn new(config: RipenessPipelineConfig) -> Result<Self, RipenessError> {
        config.validate()?;

        let classifier: Box<dyn Classifier + Send + Sync> = match config.variant {
            PipelineVariant::Rgb => Box::new(RgbClassifier::new(config.rgb)),
            PipelineVariant::MaskedHsv => Box::new(Hsv255Classifier::new(config.hsv255)),
            PipelineVariant::NormalizedHsv => {
                Box::new(HsvNormalizedClassifier::new(config.hsv_normalized))
            }
        };
        let masker = SubjectMasker::new(config.mask);

        Ok(Self {
            config,
            classifier,
            masker,
        })
    }

    /// Creates a pipeline with the stock configuration (masked-HSV variant).
    pub fn with_defaults() -> Result<Self, RipenessError> {
        Self::new(RipenessPipelineConfig::default())
    }

    /// Returns a builder for assembling a pipeline.
    pub fn builder() -> RipenessPipelineBuilder {
        RipenessPipelineBuilder::new()
    }

    /// The configuration this pipeline runs.
    pub fn config(&self) -> &RipenessPipelineConfig {
        &self.config
    }

    /// Decodes an uploaded byte stream and analyzes it.
    ///
    /// # Arguments
    ///
    /// * `bytes` - Raw encoded image bytes (JPEG or PNG).
    /// * `hint` - Optional declared source format.
    ///
    /// # Returns
    ///
    /// The analysis outcome, or an error if the bytes cannot be decoded or
    /// processing fails.
    pub fn analyze_bytes(
        &self,
        bytes: &[u8],
        hint: Option<SourceFormat>,
    ) -> Result<RipenessOutcome, RipenessError> {
        let image = decode_image(bytes, hint)?;
        self.analyze_image(&image)
    }

    /// Analyzes a decoded RGB image.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded image.
    ///
    /// # Returns
    ///
    /// * `Ok(RipenessOutcome::Classified)` - The verdict and its statistics.
    /// * `Ok(RipenessOutcome::NoSubjectDetected)` - Masking filtered out
    ///   every pixel.
    /// * `Err(RipenessError)` - Degenerate input or a processing failure.
    pub fn analyze_image(&self, image: &RgbImage) -> Result<RipenessOutcome, RipenessError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RipenessError::degenerate_input(format!(
                "zero-area image ({}x{})",
                width, height
            )));
        }

        let resized;
        let frame = match self.config.canvas {
            Some((canvas_width, canvas_height)) => {
                resized = resize_to_canvas(image, canvas_width, canvas_height);
                &resized
            }
            None => image,
        };

        let (cube, mask) = self.prepare(frame)?;

        let Some(means) = masked_channel_means(&cube, &mask)? else {
            warn!(
                variant = ?self.config.variant,
                "mask selected zero pixels, no subject detected"
            );
            return Ok(RipenessOutcome::NoSubjectDetected);
        };

        debug_assert!(means.in_range());
        let verdict = self.classifier.classify(&means)?;
        debug!(
            classifier = self.classifier.name(),
            category = %verdict.category,
            coverage = means.coverage(),
            "classified frame"
        );

        Ok(RipenessOutcome::Classified(RipenessReport::from_verdict(
            verdict, &means,
        )))
    }

    /// Runs the variant-specific conversion and masking stages.
    fn prepare(&self, frame: &RgbImage) -> Result<(ColorCube, SubjectMask), RipenessError> {
        match self.config.variant {
            PipelineVariant::Rgb => {
                let cube = ColorCube::from_rgb(frame)?;
                let mask = SubjectMask::all_on(cube.width(), cube.height());
                Ok((cube, mask))
            }
            PipelineVariant::MaskedHsv => {
                let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
                let mut cube = converter.convert(frame)?;
                if self.config.equalize_value {
                    equalize_value(&mut cube)?;
                }
                let mask = self.masker.mask(&cube)?;
                Ok((cube, mask))
            }
            PipelineVariant::NormalizedHsv => {
                let converter = ColorSpaceConverter::new(HsvConvention::Normalized);
                let cube = converter.convert(frame)?;
                let mask = SubjectMask::all_on(cube.width(), cube.height());
                Ok((cube, mask))
            }
        }
    }
}

/// Builder for the ripeness pipeline.
///
/// Starts from the stock configuration; every setter overrides one field.
/// `build` validates the assembled configuration.
#[derive(Debug, Clone, Default)]
pub struct RipenessPipelineBuilder {
    config: RipenessPipelineConfig,
}

impl RipenessPipelineBuilder {
    /// Creates a builder seeded with the stock configuration.
    pub fn new() -> Self {
        Self {
            config: RipenessPipelineConfig::default(),
        }
    }

    /// Sets the processing variant.
    pub fn variant(mut self, variant: PipelineVariant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Enables the deterministic resize to a fixed canvas.
    pub fn canvas(mut self, width: u32, height: u32) -> Self {
        self.config.canvas = Some((width, height));
        self
    }

    /// Enables or disables Value-plane equalization in the masked variant.
    pub fn equalize_value(mut self, enable: bool) -> Self {
        self.config.equalize_value = enable;
        self
    }

    /// Overrides the brightness-tiered mask bounds.
    pub fn mask_table(mut self, table: MaskTierTable) -> Self {
        self.config.mask = table;
        self
    }

    /// Overrides the plain-RGB threshold table.
    pub fn rgb_thresholds(mut self, thresholds: crate::models::RgbThresholds) -> Self {
        self.config.rgb = thresholds;
        self
    }

    /// Overrides the 8-bit HSV threshold table.
    pub fn hsv255_thresholds(mut self, thresholds: crate::models::Hsv255Thresholds) -> Self {
        self.config.hsv255 = thresholds;
        self
    }

    /// Overrides the normalized-HSV threshold table.
    pub fn hsv_normalized_thresholds(
        mut self,
        thresholds: crate::models::HsvNormalizedThresholds,
    ) -> Self {
        self.config.hsv_normalized = thresholds;
        self
    }

    /// Builds the pipeline, validating the assembled configuration.
    pub fn build(self) -> Result<RipenessPipeline, RipenessError> {
        RipenessPipeline::new(self.config)
    }
}
