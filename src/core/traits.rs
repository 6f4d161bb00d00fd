//! Core traits for ripeness classification.
//!
//! The classifier is modeled as a capability interface: the pipeline holds a
//! boxed [`Classifier`] selected once at configuration time, and calibration
//! variants (plain-RGB, 8-bit HSV, normalized HSV) are swappable
//! implementations of it. Threshold scales are never mixed mid-pipeline: a
//! classifier declares the [`ColorSpace`] its table is calibrated for and
//! refuses means measured in any other scale.

use crate::core::errors::RipenessError;
use crate::domain::{ChannelMeans, ColorSpace, Verdict};

/// Trait for rule-based ripeness classifiers.
///
/// Implementations are pure, stateless, total and deterministic: the same
/// means always produce the same verdict, every in-range input maps to some
/// category (via a catch-all or an explicit fallback rule), and no state is
/// carried between calls.
pub trait Classifier {
    /// The color space this classifier's threshold table is calibrated for.
    fn color_space(&self) -> ColorSpace;

    /// A short human-readable name for the calibration variant.
    fn name(&self) -> &'static str;

    /// Maps aggregated channel means to a ripeness verdict.
    ///
    /// # Arguments
    ///
    /// * `means` - Channel means measured in this classifier's color space.
    ///
    /// # Returns
    ///
    /// The verdict for the means, or an error if the means were measured in
    /// a different color space.
    fn classify(&self, means: &ChannelMeans) -> Result<Verdict, RipenessError>;

    /// Rejects means whose scale does not match this classifier's calibration.
    ///
    /// Implementations call this at the top of `classify`; mixing scales is
    /// always a caller bug, never a classification outcome.
    fn ensure_color_space(&self, means: &ChannelMeans) -> Result<(), RipenessError> {
        if means.space != self.color_space() {
            return Err(RipenessError::invalid_input(format!(
                "{} expects means in {}, got {}",
                self.name(),
                self.color_space(),
                means.space
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RipenessCategory, Verdict};

    struct FixedClassifier;

    impl Classifier for FixedClassifier {
        fn color_space(&self) -> ColorSpace {
            ColorSpace::Rgb8
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn classify(&self, means: &ChannelMeans) -> Result<Verdict, RipenessError> {
            self.ensure_color_space(means)?;
            Ok(Verdict {
                category: RipenessCategory::Ripe,
                label: "Ripe",
                advice: "Eat it.",
                harvest_window: None,
                display_color: None,
            })
        }
    }

    #[test]
    fn test_ensure_color_space_rejects_foreign_scale() {
        let classifier = FixedClassifier;
        let means = ChannelMeans {
            space: ColorSpace::Hsv8,
            values: [30.0, 120.0, 200.0],
            selected_pixels: 1,
            total_pixels: 1,
        };
        let err = classifier.classify(&means).unwrap_err();
        assert!(matches!(err, RipenessError::InvalidInput { .. }));
    }

    #[test]
    fn test_ensure_color_space_accepts_matching_scale() {
        let classifier = FixedClassifier;
        let means = ChannelMeans {
            space: ColorSpace::Rgb8,
            values: [200.0, 200.0, 50.0],
            selected_pixels: 1,
            total_pixels: 1,
        };
        assert!(classifier.classify(&means).is_ok());
    }
}
