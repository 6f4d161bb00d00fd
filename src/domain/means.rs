//! Color spaces and aggregated channel statistics.
//!
//! The pipeline supports three non-interchangeable channel scales. Every
//! threshold table is calibrated against exactly one of them, so aggregated
//! means carry their scale with them and classifiers reject means measured
//! in a foreign scale instead of silently misreading them.

use crate::core::constants::{HSV8_HUE_MAX, HSV8_SAT_VAL_MAX, RGB8_CHANNEL_MAX};
use serde::{Deserialize, Serialize};

/// The channel scale a pixel cube (and the means derived from it) uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSpace {
    /// 8-bit RGB: every channel in 0-255.
    Rgb8,
    /// 8-bit HSV, OpenCV-style: hue in 0-179 (degrees / 2), saturation and
    /// value in 0-255.
    Hsv8,
    /// Normalized HSV: every channel in 0.0-1.0 (hue as a fraction of a
    /// full turn).
    HsvNormalized,
}

impl ColorSpace {
    /// Returns the inclusive valid range of the given channel index.
    ///
    /// # Arguments
    ///
    /// * `channel` - Channel index (0, 1, or 2).
    pub fn channel_range(&self, channel: usize) -> (f32, f32) {
        debug_assert!(channel < 3);
        match self {
            ColorSpace::Rgb8 => (0.0, RGB8_CHANNEL_MAX),
            ColorSpace::Hsv8 => {
                if channel == 0 {
                    (0.0, HSV8_HUE_MAX)
                } else {
                    (0.0, HSV8_SAT_VAL_MAX)
                }
            }
            ColorSpace::HsvNormalized => (0.0, 1.0),
        }
    }

    /// Returns the display names of the three channels in this space.
    pub fn channel_names(&self) -> [&'static str; 3] {
        match self {
            ColorSpace::Rgb8 => ["red", "green", "blue"],
            ColorSpace::Hsv8 | ColorSpace::HsvNormalized => ["hue", "saturation", "value"],
        }
    }
}

impl std::fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColorSpace::Rgb8 => write!(f, "RGB (0-255)"),
            ColorSpace::Hsv8 => write!(f, "HSV (H 0-179, S/V 0-255)"),
            ColorSpace::HsvNormalized => write!(f, "HSV (0.0-1.0)"),
        }
    }
}

/// Per-channel means aggregated over the selected pixels of one image.
///
/// Produced by the channel aggregator; consumed by a classifier whose
/// calibration matches `space`. `selected_pixels` is always greater than
/// zero: an empty selection is reported as `None` by the aggregator, never
/// as a zeroed or NaN mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelMeans {
    /// The scale the means were measured in.
    pub space: ColorSpace,
    /// Mean of each channel over the selected pixels.
    pub values: [f32; 3],
    /// Number of pixels that contributed to the means.
    pub selected_pixels: usize,
    /// Total number of pixels in the frame.
    pub total_pixels: usize,
}

impl ChannelMeans {
    /// Fraction of the frame that contributed to the means (0.0-1.0).
    pub fn coverage(&self) -> f32 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.selected_pixels as f32 / self.total_pixels as f32
        }
    }

    /// Checks that every mean lies within the valid range of its channel.
    pub fn in_range(&self) -> bool {
        self.values.iter().enumerate().all(|(channel, &value)| {
            let (min, max) = self.space.channel_range(channel);
            value >= min && value <= max
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_ranges_per_space() {
        assert_eq!(ColorSpace::Rgb8.channel_range(0), (0.0, 255.0));
        assert_eq!(ColorSpace::Hsv8.channel_range(0), (0.0, 179.0));
        assert_eq!(ColorSpace::Hsv8.channel_range(1), (0.0, 255.0));
        assert_eq!(ColorSpace::HsvNormalized.channel_range(2), (0.0, 1.0));
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(ColorSpace::Rgb8.channel_names(), ["red", "green", "blue"]);
        assert_eq!(
            ColorSpace::Hsv8.channel_names(),
            ["hue", "saturation", "value"]
        );
    }

    #[test]
    fn test_means_coverage() {
        let means = ChannelMeans {
            space: ColorSpace::Hsv8,
            values: [30.0, 120.0, 200.0],
            selected_pixels: 25,
            total_pixels: 100,
        };
        assert!((means.coverage() - 0.25).abs() < f32::EPSILON);
        assert!(means.in_range());
    }

    #[test]
    fn test_means_out_of_range_detected() {
        let means = ChannelMeans {
            space: ColorSpace::HsvNormalized,
            values: [0.5, 1.2, 0.1],
            selected_pixels: 10,
            total_pixels: 10,
        };
        assert!(!means.in_range());
    }
}
