//! Normalized-HSV ripeness calibration.
//!
//! Operates on means where all three channels are 0.0-1.0 (hue as a fraction
//! of a full turn). This table is an independent calibration for the
//! normalized scale; it is NOT a rescaling of the 8-bit table and the two
//! must never be mixed.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::errors::RipenessError;
use crate::core::traits::Classifier;
use crate::domain::{ChannelMeans, ColorSpace, RipenessCategory, Verdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Threshold table for the normalized-HSV calibration (all values 0.0-1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvNormalizedThresholds {
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

impl Default for HsvNormalizedThresholds {
    fn default() -> Self {
        Self {
            unripe_min_hue: 0.195,
            unripe_min_saturation: 0.315,
            ripe_min_hue: 0.11,
            ripe_max_hue: 0.195,
            ripe_min_saturation: 0.355,
            ripe_min_value: 0.195,
            overripe_max_hue: 0.11,
            overripe_min_saturation: 0.235,
            overripe_max_value: 0.43,
        }
    }
}

impl ConfigValidator for HsvNormalizedThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        for (value, name) in [
            (self.unripe_min_hue, "unripe_min_hue"),
            (self.unripe_min_saturation, "unripe_min_saturation"),
            (self.ripe_min_hue, "ripe_min_hue"),
            (self.ripe_max_hue, "ripe_max_hue"),
            (self.ripe_min_saturation, "ripe_min_saturation"),
            (self.ripe_min_value, "ripe_min_value"),
            (self.overripe_max_hue, "overripe_max_hue"),
            (self.overripe_min_saturation, "overripe_min_saturation"),
            (self.overripe_max_value, "overripe_max_value"),
        ] {
            self.validate_threshold(value, 0.0, 1.0, name)?;
        }

        self.validate_ordered(self.ripe_min_hue, self.ripe_max_hue, "ripe hue band")?;
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

/// Rule-based classifier over mean normalized HSV channels.
#[derive(Debug, Clone, Default)]
pub struct HsvNormalizedClassifier {
    /// The calibration constants this classifier evaluates.
    pub thresholds: HsvNormalizedThresholds,
}

impl HsvNormalizedClassifier {
    /// Creates a classifier with the given threshold table.
    pub fn new(thresholds: HsvNormalizedThresholds) -> Self {
        Self { thresholds }
    }
}

impl Classifier for HsvNormalizedClassifier {
    fn color_space(&self) -> ColorSpace {
        ColorSpace::HsvNormalized
    }

    fn name(&self) -> &'static str {
        "normalized hsv classifier"
    }

    /// Evaluates the ordered rule table; the first matching rule wins.
    fn classify(&self, means: &ChannelMeans) -> Result<Verdict, RipenessError> {
        self.ensure_color_space(means)?;
        let t = &self.thresholds;
        let [h, s, v] = means.values;

        let verdict = if h >= t.unripe_min_hue && s > t.unripe_min_saturation {
            Verdict {
                category: RipenessCategory::Unripe,
                label: "Unripe (Green)",
                advice: "The peel is still mostly green. Leave the fruit on the plant for now.",
                harvest_window: None,
                display_color: None,
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
                harvest_window: None,
                display_color: None,
            }
        } else if h < t.overripe_max_hue
            && s > t.overripe_min_saturation
            && v <= t.overripe_max_value
        {
            Verdict {
                category: RipenessCategory::Overripe,
                label: "Overripe (Brown)",
                advice: "Dark browning detected. The fruit is past its peak.",
                harvest_window: None,
                display_color: None,
            }
        } else {
            Verdict {
                category: RipenessCategory::Ambiguous,
                label: "Semi-ripe / Ambiguous",
                advice: "The color statistics match no clear stage. Inspect the fruit visually.",
                harvest_window: None,
                display_color: None,
            }
        };

        debug!(category = %verdict.category, h, s, v, "normalized hsv classification");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(values: [f32; 3]) -> ChannelMeans {
        ChannelMeans {
            space: ColorSpace::HsvNormalized,
            values,
            selected_pixels: 100,
            total_pixels: 100,
        }
    }

    fn classify(values: [f32; 3]) -> Verdict {
        HsvNormalizedClassifier::default()
            .classify(&means(values))
            .unwrap()
    }

    #[test]
    fn test_green_hue_is_unripe() {
        // Pure green: h = 120/360.
        let verdict = classify([1.0 / 3.0, 1.0, 1.0]);
        assert_eq!(verdict.category, RipenessCategory::Unripe);
    }

    #[test]
    fn test_yellow_hue_is_ripe() {
        // Pure yellow: h = 60/360.
        let verdict = classify([1.0 / 6.0, 1.0, 1.0]);
        assert_eq!(verdict.category, RipenessCategory::Ripe);
    }

    #[test]
    fn test_dark_brown_is_overripe() {
        // RGB (80, 40, 20) normalizes to roughly (0.056, 0.75, 0.31).
        let verdict = classify([0.056, 0.75, 0.31]);
        assert_eq!(verdict.category, RipenessCategory::Overripe);
    }

    #[test]
    fn test_low_saturation_is_ambiguous() {
        let verdict = classify([0.15, 0.2, 0.9]);
        assert_eq!(verdict.category, RipenessCategory::Ambiguous);
    }

    #[test]
    fn test_unripe_hue_floor_inclusive() {
        let at_boundary = classify([0.195, 0.4, 0.5]);
        assert_eq!(at_boundary.category, RipenessCategory::Unripe);

        let below = classify([0.1949, 0.4, 0.5]);
        assert_ne!(below.category, RipenessCategory::Unripe);
    }

    #[test]
    fn test_hue_band_edges_between_rules() {
        // Hue exactly at the ripe floor belongs to the ripe band.
        let verdict = classify([0.11, 0.5, 0.5]);
        assert_eq!(verdict.category, RipenessCategory::Ripe);

        // Just below it, with a low value, overripe fires.
        let verdict = classify([0.1099, 0.5, 0.4]);
        assert_eq!(verdict.category, RipenessCategory::Overripe);
    }

    #[test]
    fn test_deterministic() {
        let sample = means([0.14, 0.6, 0.7]);
        let classifier = HsvNormalizedClassifier::default();
        assert_eq!(
            classifier.classify(&sample).unwrap(),
            classifier.classify(&sample).unwrap()
        );
    }

    #[test]
    fn test_rejects_eight_bit_means() {
        let eight_bit = ChannelMeans {
            space: ColorSpace::Hsv8,
            values: [30.0, 120.0, 200.0],
            selected_pixels: 10,
            total_pixels: 10,
        };
        assert!(HsvNormalizedClassifier::default()
            .classify(&eight_bit)
            .is_err());
    }

    #[test]
    fn test_default_table_validates() {
        assert!(HsvNormalizedThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_scale_table_rejected() {
        // An 8-bit style value in the normalized table must fail validation.
        let mixed = HsvNormalizedThresholds {
            unripe_min_saturation: 80.0,
            ..Default::default()
        };
        assert!(mixed.validate().is_err());
    }
}
