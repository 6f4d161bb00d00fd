//! 8-bit HSV ripeness calibration.
//!
//! The masked-HSV variant's calibration: hue in 0-179 (degrees / 2),
//! saturation and value in 0-255, matching the cube the
//! [`ColorSpaceConverter`](crate::processors::ColorSpaceConverter) produces
//! under [`HsvConvention::EightBit`](crate::processors::HsvConvention).
//! Verdicts carry an estimated harvest window and an RGB display-color tag.
//!
//! The hue bands tile the axis without overlap: Overripe covers hue below
//! 20, Ripe covers 20 inclusive to 35 exclusive, Unripe starts at 35
//! inclusive. Inputs matching no specific rule land in the Ambiguous bucket.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{HSV8_HUE_MAX, HSV8_SAT_VAL_MAX};
use crate::core::errors::RipenessError;
use crate::core::traits::Classifier;
use crate::domain::{ChannelMeans, ColorSpace, RipenessCategory, Verdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Threshold table for the 8-bit HSV calibration.
///
/// Fixed calibration constants, reproduced with their exact boundary
/// inclusivity (`>=` for the unripe hue floor, strict `>` for saturation
/// floors, `<=` for the overripe value ceiling). Not interchangeable with
/// the normalized table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv255Thresholds {
    /// Unripe rule: mean hue at or above this (inclusive).
    pub unripe_min_hue: f32,
    /// Unripe rule: mean saturation strictly above this.
    pub unripe_min_saturation: f32,
    /// Ripe rule: mean hue at or above this (inclusive).
    pub ripe_min_hue: f32,
    /// Ripe rule: mean hue strictly below this.
    pub ripe_max_hue: f32,
    /// Ripe rule: mean saturation strictly above this.
    pub ripe_min_saturation: f32,
    /// Ripe rule: mean value strictly above this.
    pub ripe_min_value: f32,
    /// Overripe rule: mean hue strictly below this.
    pub overripe_max_hue: f32,
    /// Overripe rule: mean saturation strictly above this.
    pub overripe_min_saturation: f32,
    /// Overripe rule: mean value at or below this (inclusive).
    pub overripe_max_value: f32,
}

impl Default for Hsv255Thresholds {
    fn default() -> Self {
        Self {
            unripe_min_hue: 35.0,
            unripe_min_saturation: 80.0,
            ripe_min_hue: 20.0,
            ripe_max_hue: 35.0,
            ripe_min_saturation: 90.0,
            ripe_min_value: 50.0,
            overripe_max_hue: 20.0,
            overripe_min_saturation: 60.0,
            overripe_max_value: 110.0,
        }
    }
}

impl ConfigValidator for Hsv255Thresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        for (value, name) in [
            (self.unripe_min_hue, "unripe_min_hue"),
            (self.ripe_min_hue, "ripe_min_hue"),
            (self.ripe_max_hue, "ripe_max_hue"),
            (self.overripe_max_hue, "overripe_max_hue"),
        ] {
            self.validate_threshold(value, 0.0, HSV8_HUE_MAX, name)?;
        }
        for (value, name) in [
            (self.unripe_min_saturation, "unripe_min_saturation"),
            (self.ripe_min_saturation, "ripe_min_saturation"),
            (self.ripe_min_value, "ripe_min_value"),
            (self.overripe_min_saturation, "overripe_min_saturation"),
            (self.overripe_max_value, "overripe_max_value"),
        ] {
            self.validate_threshold(value, 0.0, HSV8_SAT_VAL_MAX, name)?;
        }

        self.validate_ordered(self.ripe_min_hue, self.ripe_max_hue, "ripe hue band")?;
        // Hue bands must tile the axis: Overripe ends where Ripe begins,
        // Ripe ends where Unripe begins.
        if self.overripe_max_hue > self.ripe_min_hue {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "overripe_max_hue {} overlaps the ripe band starting at {}",
                    self.overripe_max_hue, self.ripe_min_hue
                ),
            });
        }
        if self.ripe_max_hue > self.unripe_min_hue {
            return Err(ConfigError::ValidationFailed {
                message: format!(
                    "ripe_max_hue {} overlaps the unripe band starting at {}",
                    self.ripe_max_hue, self.unripe_min_hue
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Rule-based classifier over mean 8-bit HSV channels.
#[derive(Debug, Clone, Default)]
pub struct Hsv255Classifier {
    /// The calibration constants this classifier evaluates.
    pub thresholds: Hsv255Thresholds,
}

impl Hsv255Classifier {
    /// Creates a classifier with the given threshold table.
    pub fn new(thresholds: Hsv255Thresholds) -> Self {
        Self { thresholds }
    }
}

impl Classifier for Hsv255Classifier {
    fn color_space(&self) -> ColorSpace {
        ColorSpace::Hsv8
    }

    fn name(&self) -> &'static str {
        "8-bit hsv classifier"
    }

    /// Evaluates the ordered rule table; the first matching rule wins.
    ///
    /// 1. Unripe (green): `h >= 35 && s > 80`.
    /// 2. Ripe (yellow): `20 <= h < 35 && s > 90 && v > 50`.
    /// 3. Overripe (brown): `h < 20 && s > 60 && v <= 110`.
    /// 4. Ambiguous: everything else.
    fn classify(&self, means: &ChannelMeans) -> Result<Verdict, RipenessError> {
        self.ensure_color_space(means)?;
        let t = &self.thresholds;
        let [h, s, v] = means.values;

        let verdict = if h >= t.unripe_min_hue && s > t.unripe_min_saturation {
            Verdict {
                category: RipenessCategory::Unripe,
                label: "Unripe (Green)",
                advice: "The peel is still mostly green. Leave the fruit on the plant for now.",
                harvest_window: Some("7-10 days to harvest"),
                display_color: Some([0, 255, 0]),
            }
        } else if h >= t.ripe_min_hue
            && h < t.ripe_max_hue
            && s > t.ripe_min_saturation
            && v > t.ripe_min_value
        {
            Verdict {
                category: RipenessCategory::Ripe,
                label: "Ripe (Yellow)",
                advice: "The fruit shows a full yellow peel. Pick it soon for peak flavor.",
                harvest_window: Some("1-3 days to harvest"),
                display_color: Some([255, 255, 0]),
            }
        } else if h < t.overripe_max_hue
            && s > t.overripe_min_saturation
            && v <= t.overripe_max_value
        {
            Verdict {
                category: RipenessCategory::Overripe,
                label: "Overripe (Brown)",
                advice: "Dark browning detected. The fruit is past its peak.",
                harvest_window: Some("Harvest immediately"),
                display_color: Some([255, 140, 0]),
            }
        } else {
            Verdict {
                category: RipenessCategory::Ambiguous,
                label: "Semi-ripe / Ambiguous",
                advice: "The color statistics match no clear stage. Inspect the fruit visually.",
                harvest_window: Some("4-6 days to harvest (check visually)"),
                display_color: Some([255, 255, 255]),
            }
        };

        debug!(category = %verdict.category, h, s, v, "hsv255 classification");
        Ok(verdict)
    }
}
