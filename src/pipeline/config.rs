//! Pipeline configuration.
//!
//! The pipeline variant and every calibration table are selected here, once,
//! before any image is processed. Tables are plain serde structs so tests
//! (and adventurous deployments) can substitute alternate calibrations, and
//! whole configurations can be loaded from JSON.

use crate::core::config::{ConfigError, ConfigValidator, ConfigValidatorExt};
use crate::core::errors::RipenessError;
use crate::models::{Hsv255Thresholds, HsvNormalizedThresholds, RgbThresholds};
use crate::processors::MaskTierTable;
use serde::{Deserialize, Serialize};

/// The processing variant the pipeline runs.
///
/// Chosen once at configuration time and never mixed mid-pipeline: each
/// variant pairs one converter convention with the one threshold table
/// calibrated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PipelineVariant {
    /// No conversion, no masking; classify mean RGB of the whole frame.
    Rgb,
    /// 8-bit HSV with Value equalization and brightness-tiered masking.
    #[default]
    MaskedHsv,
    /// Normalized HSV over the whole frame (mask of all true).
    NormalizedHsv,
}

/// Configuration for the ripeness pipeline.
///
/// Defaults reproduce the stock calibrations. `canvas` enables the
/// deterministic resize to a fixed processing resolution; `equalize_value`
/// controls the brightness-normalization step of the masked variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RipenessPipelineConfig {
    /// The processing variant to run.
    #[serde(default)]
    pub variant: PipelineVariant,

    /// Optional fixed canvas size (width, height) images are resized to
    /// before processing.
    #[serde(default)]
    pub canvas: Option<(u32, u32)>,

    /// Whether the masked variant histogram-equalizes the Value plane
    /// before masking.
    #[serde(default = "default_true")]
    pub equalize_value: bool,

    /// Brightness-tiered mask bounds for the masked variant.
    #[serde(default)]
    pub mask: MaskTierTable,

    /// Threshold table for the plain-RGB variant.
    #[serde(default)]
    pub rgb: RgbThresholds,

    /// Threshold table for the 8-bit HSV variant.
    #[serde(default)]
    pub hsv255: Hsv255Thresholds,

    /// Threshold table for the normalized-HSV variant.
    #[serde(default)]
    pub hsv_normalized: HsvNormalizedThresholds,
}

fn default_true() -> bool {
    true
}

impl Default for RipenessPipelineConfig {
    fn default() -> Self {
        Self {
            variant: PipelineVariant::default(),
            canvas: None,
            equalize_value: true,
            mask: MaskTierTable::default(),
            rgb: RgbThresholds::default(),
            hsv255: Hsv255Thresholds::default(),
            hsv_normalized: HsvNormalizedThresholds::default(),
        }
    }
}

impl RipenessPipelineConfig {
    /// Creates a configuration with default calibrations for a variant.
    pub fn for_variant(variant: PipelineVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON string.
    ///
    /// Missing fields fall back to the stock calibrations; the loaded
    /// configuration is validated before being returned.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text describing the configuration.
    ///
    /// # Returns
    ///
    /// The validated configuration, or a `Config` error if the JSON is
    /// malformed or a table fails validation.
    pub fn from_json(json: &str) -> Result<Self, RipenessError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RipenessError::config_error(format!("failed to parse JSON: {}", e)))?;
        config.validate_and_wrap()
    }
}

impl ConfigValidator for RipenessPipelineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some((width, height)) = self.canvas {
            self.validate_image_dimensions(width, height)?;
        }
        self.mask.validate()?;
        self.rgb.validate()?;
        self.hsv255.validate()?;
        self.hsv_normalized.validate()?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
