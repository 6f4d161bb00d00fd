//! Plain-RGB ripeness calibration.
//!
//! The simplest variant: no color-space conversion, no masking, a
//! three-rule decision over mean red/green/blue channel dominance. The
//! fallback bucket is Overripe by design choice, so the rule table is total
//! without an Ambiguous category.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::RGB8_CHANNEL_MAX;
use crate::core::errors::RipenessError;
use crate::core::traits::Classifier;
use crate::domain::{ChannelMeans, ColorSpace, RipenessCategory, Verdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Threshold table for the plain-RGB calibration, in the 0-255 scale.
///
/// These are fixed calibration constants; they are not derived from the
/// other calibrations and must not be applied to HSV means.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbThresholds {
    /// Unripe rule: mean green must exceed this.
    pub unripe_min_green: f32,
    /// Unripe rule: mean red must stay below this.
    pub unripe_max_red: f32,
    /// Ripe rule: mean red must exceed this.
    pub ripe_min_red: f32,
    /// Ripe rule: mean green must exceed this.
    pub ripe_min_green: f32,
    /// Ripe rule: mean blue must stay below this.
    pub ripe_max_blue: f32,
}

impl Default for RgbThresholds {
    fn default() -> Self {
        Self {
            unripe_min_green: 150.0,
            unripe_max_red: 100.0,
            ripe_min_red: 150.0,
            ripe_min_green: 150.0,
            ripe_max_blue: 100.0,
        }
    }
}

impl ConfigValidator for RgbThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_threshold(self.unripe_min_green, 0.0, RGB8_CHANNEL_MAX, "unripe_min_green")?;
        self.validate_threshold(self.unripe_max_red, 0.0, RGB8_CHANNEL_MAX, "unripe_max_red")?;
        self.validate_threshold(self.ripe_min_red, 0.0, RGB8_CHANNEL_MAX, "ripe_min_red")?;
        self.validate_threshold(self.ripe_min_green, 0.0, RGB8_CHANNEL_MAX, "ripe_min_green")?;
        self.validate_threshold(self.ripe_max_blue, 0.0, RGB8_CHANNEL_MAX, "ripe_max_blue")?;
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// Rule-based classifier over mean RGB channels.
#[derive(Debug, Clone, Default)]
pub struct RgbClassifier {
    /// The calibration constants this classifier evaluates.
    pub thresholds: RgbThresholds,
}

impl RgbClassifier {
    /// Creates a classifier with the given threshold table.
    pub fn new(thresholds: RgbThresholds) -> Self {
        Self { thresholds }
    }
}

impl Classifier for RgbClassifier {
    fn color_space(&self) -> ColorSpace {
        ColorSpace::Rgb8
    }

    fn name(&self) -> &'static str {
        "rgb classifier"
    }

    /// Evaluates the ordered rule table; the first matching rule wins.
    ///
    /// 1. Unripe: high green, low red.
    /// 2. Ripe: high red and green (yellow mix), low blue.
    /// 3. Fallback: everything else (usually dark or brown) is Overripe.
    fn classify(&self, means: &ChannelMeans) -> Result<Verdict, RipenessError> {
        self.ensure_color_space(means)?;
        let t = &self.thresholds;
        let [r, g, b] = means.values;

        let verdict = if g > t.unripe_min_green && r < t.unripe_max_red {
            Verdict {
                category: RipenessCategory::Unripe,
                label: "Under-ripe (Green)",
                advice: "The banana is still very green. Wait a few days for optimal sweetness.",
                harvest_window: None,
                display_color: None,
            }
        } else if r > t.ripe_min_red && g > t.ripe_min_green && b < t.ripe_max_blue {
            Verdict {
                category: RipenessCategory::Ripe,
                label: "Perfectly Ripe",
                advice: "This banana is at peak ripeness. Enjoy it now!",
                harvest_window: None,
                display_color: None,
            }
        } else {
            Verdict {
                category: RipenessCategory::Overripe,
                label: "Over-ripe / Other",
                advice: "The banana may be over-ripe or browning. Best for baking or smoothies.",
                harvest_window: None,
                display_color: None,
            }
        };

        debug!(category = %verdict.category, "rgb classification");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn means(values: [f32; 3]) -> ChannelMeans {
        ChannelMeans {
            space: ColorSpace::Rgb8,
            values,
            selected_pixels: 100,
            total_pixels: 100,
        }
    }

    fn classify(values: [f32; 3]) -> Verdict {
        RgbClassifier::default().classify(&means(values)).unwrap()
    }

    #[test]
    fn test_pure_green_is_unripe() {
        let verdict = classify([0.0, 255.0, 0.0]);
        assert_eq!(verdict.category, RipenessCategory::Unripe);
        assert_eq!(verdict.label, "Under-ripe (Green)");
    }

    #[test]
    fn test_pure_yellow_is_ripe() {
        let verdict = classify([255.0, 255.0, 0.0]);
        assert_eq!(verdict.category, RipenessCategory::Ripe);
    }

    #[test]
    fn test_dark_brown_falls_through_to_overripe() {
        let verdict = classify([80.0, 40.0, 20.0]);
        assert_eq!(verdict.category, RipenessCategory::Overripe);
    }

    #[test]
    fn test_rule_order_unripe_wins_over_ripe() {
        // Green dominates and red is low: rule 1 fires even though green
        // also exceeds the ripe rule's green threshold.
        let verdict = classify([99.0, 200.0, 50.0]);
        assert_eq!(verdict.category, RipenessCategory::Unripe);
    }

    #[test]
    fn test_boundary_exclusivity() {
        // Thresholds are strict: exactly 150 green does not fire the unripe
        // rule, exactly 100 red does not pass its upper bound.
        let verdict = classify([50.0, 150.0, 0.0]);
        assert_eq!(verdict.category, RipenessCategory::Overripe);

        let verdict = classify([100.0, 200.0, 0.0]);
        assert_eq!(verdict.category, RipenessCategory::Overripe);
    }

    #[test]
    fn test_deterministic() {
        let sample = means([120.0, 180.0, 90.0]);
        let classifier = RgbClassifier::default();
        let first = classifier.classify(&sample).unwrap();
        let second = classifier.classify(&sample).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_hsv_means() {
        let hsv = ChannelMeans {
            space: ColorSpace::Hsv8,
            values: [30.0, 120.0, 200.0],
            selected_pixels: 10,
            total_pixels: 10,
        };
        assert!(RgbClassifier::default().classify(&hsv).is_err());
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(RgbThresholds::default().validate().is_ok());
        let bad = RgbThresholds {
            ripe_min_red: 300.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
