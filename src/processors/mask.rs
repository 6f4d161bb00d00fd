//! Subject masking: restricting analysis to pixels likely to be the fruit.
//!
//! The masker selects pixels whose HSV samples fall inside a brightness-tiered
//! bounds table, then cleans the raw selection with a median filter and a
//! morphological opening so that isolated speckles drop out while larger
//! connected regions survive.

use crate::core::config::{ConfigError, ConfigValidator};
use crate::core::constants::{
    HSV8_HUE_MAX, HSV8_SAT_VAL_MAX, MASK_MEDIAN_RADIUS, MASK_OPENING_RADIUS,
};
use crate::core::errors::{ProcessingStage, RipenessError};
use crate::domain::ColorSpace;
use crate::processors::types::ColorCube;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive lower/upper HSV bounds, in the 8-bit convention.
///
/// A pixel is selected when all three of its channels lie inside the bounds
/// simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvBounds {
    /// Lower bound per channel (hue, saturation, value).
    pub lower: [f32; 3],
    /// Upper bound per channel (hue, saturation, value).
    pub upper: [f32; 3],
}

impl HsvBounds {
    /// Whether the pixel lies inside the bounds on all three channels.
    #[inline]
    pub fn contains(&self, pixel: [f32; 3]) -> bool {
        (0..3).all(|c| pixel[c] >= self.lower[c] && pixel[c] <= self.upper[c])
    }
}

/// The fixed two-tier bounds table selected by mean frame brightness.
///
/// At low overall brightness a wider saturation/value tolerance is used so
/// dim fruit is not filtered away with the shadows; at higher brightness the
/// bounds tighten to exclude dull backgrounds. The tiers are hand-tuned
/// calibration constants, not a continuous function of brightness.
///
/// Defaults: brightness below 100 selects the dark tier with lower bounds
/// `[0, 50, 40]`; otherwise the bright tier with lower bounds `[0, 60, 50]`.
/// Both tiers share the upper bounds `[85, 255, 255]`, keeping the hue window
/// wide enough to span green (H > 40) down to brown (H < 20).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskTierTable {
    /// Mean-Value breakpoint below which the dark tier applies.
    pub dark_brightness_cutoff: f32,
    /// Bounds used when mean brightness is below the cutoff.
    pub dark: HsvBounds,
    /// Bounds used when mean brightness is at or above the cutoff.
    pub bright: HsvBounds,
}

impl Default for MaskTierTable {
    fn default() -> Self {
        Self {
            dark_brightness_cutoff: 100.0,
            dark: HsvBounds {
                lower: [0.0, 50.0, 40.0],
                upper: [85.0, 255.0, 255.0],
            },
            bright: HsvBounds {
                lower: [0.0, 60.0, 50.0],
                upper: [85.0, 255.0, 255.0],
            },
        }
    }
}

impl MaskTierTable {
    /// Picks the tier for the given mean frame brightness.
    pub fn tier_for(&self, brightness: f32) -> &HsvBounds {
        if brightness < self.dark_brightness_cutoff {
            &self.dark
        } else {
            &self.bright
        }
    }
}

impl ConfigValidator for MaskTierTable {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_threshold(
            self.dark_brightness_cutoff,
            0.0,
            HSV8_SAT_VAL_MAX,
            "dark_brightness_cutoff",
        )?;

        for (tier, bounds) in [("dark", &self.dark), ("bright", &self.bright)] {
            let maxima = [HSV8_HUE_MAX, HSV8_SAT_VAL_MAX, HSV8_SAT_VAL_MAX];
            for channel in 0..3 {
                let name = format!("{} tier channel {}", tier, channel);
                self.validate_threshold(bounds.lower[channel], 0.0, maxima[channel], &name)?;
                self.validate_threshold(bounds.upper[channel], 0.0, maxima[channel], &name)?;
                if bounds.lower[channel] > bounds.upper[channel] {
                    return Err(ConfigError::ValidationFailed {
                        message: format!("{}: lower bound exceeds upper bound", name),
                    });
                }
            }
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}

/// A boolean pixel selector over one frame.
///
/// Backed by a `GrayImage` where 0 means background and 255 means subject,
/// matching the representation the morphology operators work on.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectMask {
    inner: GrayImage,
}

impl SubjectMask {
    /// Wraps an existing 0/255 gray mask.
    pub fn from_gray(inner: GrayImage) -> Self {
        Self { inner }
    }

    /// A mask selecting every pixel of a (width x height) frame.
    ///
    /// Used by the no-masking pipeline variants so the aggregator contract
    /// is uniform across variants.
    pub fn all_on(width: u32, height: u32) -> Self {
        Self {
            inner: GrayImage::from_pixel(width, height, Luma([255u8])),
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Whether the pixel at (x, y) is selected.
    #[inline]
    pub fn is_selected(&self, x: u32, y: u32) -> bool {
        self.inner.get_pixel(x, y)[0] > 0
    }

    /// Number of selected pixels.
    pub fn selected_pixels(&self) -> usize {
        self.inner.pixels().filter(|p| p[0] > 0).count()
    }

    /// Whether no pixel is selected.
    pub fn is_empty(&self) -> bool {
        self.inner.pixels().all(|p| p[0] == 0)
    }

    /// Fraction of the frame that is selected (0.0-1.0).
    pub fn coverage(&self) -> f32 {
        let total = (self.width() * self.height()) as usize;
        if total == 0 {
            0.0
        } else {
            self.selected_pixels() as f32 / total as f32
        }
    }

    /// Read access to the underlying gray mask.
    pub fn as_gray(&self) -> &GrayImage {
        &self.inner
    }
}

/// Applies a morphological opening (erosion then dilation) to a 0/255 mask.
///
/// Removes fragments smaller than the square structuring element while
/// preserving larger connected regions. Opening is idempotent: applying it
/// twice yields the same mask as applying it once.
pub fn morphological_open(mask: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::open(mask, Norm::LInf, radius)
}

/// Produces refined subject masks from 8-bit HSV cubes.
///
/// Pipeline: tier selection from mean brightness, in-range test, median
/// smoothing, morphological opening.
#[derive(Debug, Clone)]
pub struct SubjectMasker {
    /// The brightness-tiered bounds table.
    pub tiers: MaskTierTable,
    /// Median filter radius (3 = the 7x7 window).
    pub median_radius: u32,
    /// Opening radius under the Chebyshev norm (2 = the 5x5 square kernel).
    pub opening_radius: u8,
}

impl Default for SubjectMasker {
    fn default() -> Self {
        Self {
            tiers: MaskTierTable::default(),
            median_radius: MASK_MEDIAN_RADIUS,
            opening_radius: MASK_OPENING_RADIUS,
        }
    }
}

impl SubjectMasker {
    /// Creates a masker with the given tier table and default filter sizes.
    pub fn new(tiers: MaskTierTable) -> Self {
        Self {
            tiers,
            ..Self::default()
        }
    }

    /// Computes the refined subject mask for an 8-bit HSV cube.
    ///
    /// # Arguments
    ///
    /// * `cube` - An `Hsv8` cube (equalized or not); other spaces are rejected
    ///   because the tier table is calibrated in the 8-bit scale.
    ///
    /// # Returns
    ///
    /// The refined mask. An empty mask is a valid result meaning no subject
    /// was found; the caller decides how to surface it.
    pub fn mask(&self, cube: &ColorCube) -> Result<SubjectMask, RipenessError> {
        if cube.space() != ColorSpace::Hsv8 {
            return Err(RipenessError::processing_message(
                ProcessingStage::Masking,
                format!("subject masking requires Hsv8, got {}", cube.space()),
            ));
        }

        let brightness = cube.channel_mean(2);
        let bounds = self.tiers.tier_for(brightness);
        debug!(
            brightness,
            dark_tier = brightness < self.tiers.dark_brightness_cutoff,
            "selected mask tier"
        );

        let width = cube.width();
        let height = cube.height();
        let mut raw = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let selected = bounds.contains(cube.pixel(x, y));
                raw.put_pixel(x, y, Luma([if selected { 255u8 } else { 0u8 }]));
            }
        }

        let smoothed = imageproc::filter::median_filter(&raw, self.median_radius, self.median_radius);
        let opened = morphological_open(&smoothed, self.opening_radius);

        let mask = SubjectMask::from_gray(opened);
        debug!(coverage = mask.coverage(), "refined subject mask");
        Ok(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::colorspace::ColorSpaceConverter;
    use crate::processors::types::HsvConvention;
    use image::{Rgb, RgbImage};

    fn hsv_cube(img: &RgbImage) -> ColorCube {
        ColorSpaceConverter::new(HsvConvention::EightBit)
            .convert(img)
            .unwrap()
    }

    #[test]
    fn test_uniform_saturated_green_fully_selected() {
        let img = RgbImage::from_pixel(24, 24, Rgb([0, 200, 0]));
        let mask = SubjectMasker::default().mask(&hsv_cube(&img)).unwrap();
        assert!((mask.coverage() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_all_black_frame_yields_empty_mask() {
        // Saturation of a black frame is zero, below both tier lower bounds.
        let img = RgbImage::from_pixel(24, 24, Rgb([0, 0, 0]));
        let mask = SubjectMasker::default().mask(&hsv_cube(&img)).unwrap();
        assert!(mask.is_empty());
        assert_eq!(mask.selected_pixels(), 0);
    }

    #[test]
    fn test_dark_tier_admits_lower_saturation() {
        // Saturation ~55 sits between the dark lower bound (50) and the
        // bright lower bound (60); only the dark tier admits it.
        let table = MaskTierTable::default();
        let dim = [30.0, 55.0, 45.0];
        assert!(table.tier_for(45.0).contains(dim));
        assert!(!table.tier_for(150.0).contains(dim));
    }

    #[test]
    fn test_masker_applies_brightness_tier() {
        // RGB (64, 52, 29): V = 64, below the 100 cutoff, S ~= 139. Selected
        // under either tier, but the point is the tier table is consulted
        // with the frame's own brightness.
        let img = RgbImage::from_pixel(16, 16, Rgb([64, 52, 29]));
        let cube = hsv_cube(&img);
        assert!(cube.channel_mean(2) < 100.0);
        let mask = SubjectMasker::default().mask(&cube).unwrap();
        assert!((mask.coverage() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_isolated_speckle_removed_block_survives() {
        // Background far outside bounds, one in-bounds speckle, and a solid
        // 12x12 in-bounds block. The speckle must not survive refinement;
        // the block must.
        let mut img = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        for y in 4..16 {
            for x in 4..16 {
                img.put_pixel(x, y, Rgb([0, 200, 0]));
            }
        }
        img.put_pixel(28, 28, Rgb([0, 200, 0]));

        let mask = SubjectMasker::default().mask(&hsv_cube(&img)).unwrap();
        assert!(!mask.is_selected(28, 28));
        assert!(mask.is_selected(9, 9));
        assert!(!mask.is_empty());
    }

    #[test]
    fn test_opening_is_idempotent() {
        let mut img = RgbImage::from_pixel(32, 32, Rgb([0, 0, 0]));
        for y in 8..24 {
            for x in 6..20 {
                img.put_pixel(x, y, Rgb([0, 180, 40]));
            }
        }
        let mask = SubjectMasker::default().mask(&hsv_cube(&img)).unwrap();

        let once = morphological_open(mask.as_gray(), MASK_OPENING_RADIUS);
        let twice = morphological_open(&once, MASK_OPENING_RADIUS);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_masker_rejects_non_hsv8_cube() {
        let img = RgbImage::from_pixel(8, 8, Rgb([0, 200, 0]));
        let cube = ColorSpaceConverter::new(HsvConvention::Normalized)
            .convert(&img)
            .unwrap();
        let err = SubjectMasker::default().mask(&cube).unwrap_err();
        assert!(matches!(err, RipenessError::Processing { .. }));
    }

    #[test]
    fn test_all_on_mask() {
        let mask = SubjectMask::all_on(5, 4);
        assert_eq!(mask.selected_pixels(), 20);
        assert!((mask.coverage() - 1.0).abs() < f32::EPSILON);
        assert!(!mask.is_empty());
    }

    #[test]
    fn test_tier_table_validation() {
        let mut table = MaskTierTable::default();
        assert!(table.validate().is_ok());

        table.dark.lower[1] = 300.0;
        assert!(table.validate().is_err());

        let mut inverted = MaskTierTable::default();
        inverted.bright.lower[0] = 90.0;
        inverted.bright.upper[0] = 85.0;
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_tier_table_serde_roundtrip() {
        let table = MaskTierTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let back: MaskTierTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
