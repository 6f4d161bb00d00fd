//! Color-space conversion for ripeness analysis.
//!
//! Converts decoded RGB frames into HSV pixel cubes under one of the two
//! supported conventions, and optionally histogram-equalizes the Value plane
//! to reduce sensitivity to uneven lighting before masking.

use crate::core::constants::PARALLEL_PIXEL_THRESHOLD;
use crate::core::errors::{ProcessingStage, RipenessError};
use crate::domain::ColorSpace;
use crate::processors::types::{ColorCube, HsvConvention};
use image::{GrayImage, RgbImage};
use ndarray::Array3;
use rayon::prelude::*;

/// Converts an RGB pixel to hue (degrees, 0-360), saturation and value (0.0-1.0).
///
/// Standard hexagonal-projection formulas; gray pixels (max == min) get hue
/// and saturation zero.
fn rgb_to_hsv_unit(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let saturation = if max == 0.0 { 0.0 } else { delta / max };

    (hue, saturation, max)
}

/// Converts RGB frames into HSV pixel cubes under a fixed convention.
///
/// The convention is chosen once at configuration time; the produced cube is
/// tagged with the matching [`ColorSpace`] so downstream stages can enforce
/// that thresholds calibrated for one scale are never applied to the other.
#[derive(Debug, Clone, Copy)]
pub struct ColorSpaceConverter {
    /// The HSV output convention.
    pub convention: HsvConvention,
}

impl ColorSpaceConverter {
    /// Creates a converter for the given convention.
    pub fn new(convention: HsvConvention) -> Self {
        Self { convention }
    }

    /// Converts an RGB image into an HSV cube.
    ///
    /// Rows are converted in parallel for frames above the pixel threshold.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded RGB image.
    ///
    /// # Returns
    ///
    /// The HSV cube, or `DegenerateInput` for a zero-area image.
    pub fn convert(&self, image: &RgbImage) -> Result<ColorCube, RipenessError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RipenessError::degenerate_input(format!(
                "zero-area image ({}x{})",
                width, height
            )));
        }

        let convention = self.convention;
        let row_len = width as usize * 3;
        let raw = image.as_raw();

        let convert_row = |row: &[u8]| -> Vec<f32> {
            let mut out = Vec::with_capacity(row_len);
            for px in row.chunks_exact(3) {
                let (h, s, v) = rgb_to_hsv_unit(px[0], px[1], px[2]);
                match convention {
                    HsvConvention::EightBit => {
                        // Hue tops out at 179 in the 8-bit convention.
                        out.push((h / 2.0).min(179.0));
                        out.push(s * 255.0);
                        out.push(v * 255.0);
                    }
                    HsvConvention::Normalized => {
                        out.push(h / 360.0);
                        out.push(s);
                        out.push(v);
                    }
                }
            }
            out
        };

        let samples: Vec<f32> = if (width * height) as usize >= PARALLEL_PIXEL_THRESHOLD {
            raw.par_chunks_exact(row_len)
                .flat_map_iter(convert_row)
                .collect()
        } else {
            raw.chunks_exact(row_len).flat_map(convert_row).collect()
        };

        let data = Array3::from_shape_vec((height as usize, width as usize, 3), samples)?;
        ColorCube::new(convention.color_space(), data)
    }
}

/// Histogram-equalizes the Value plane of an 8-bit HSV cube in place.
///
/// This is the brightness-normalization step applied before masking: it
/// stretches the Value distribution so the tier selection and bounds react
/// to relative rather than absolute lighting. Hue and saturation are left
/// untouched.
///
/// # Arguments
///
/// * `cube` - An `Hsv8` cube; any other space is rejected.
///
/// # Returns
///
/// Ok on success, or a `Processing` error when the cube is not in the 8-bit
/// HSV convention.
pub fn equalize_value(cube: &mut ColorCube) -> Result<(), RipenessError> {
    if cube.space() != ColorSpace::Hsv8 {
        return Err(RipenessError::processing_message(
            ProcessingStage::Equalization,
            format!("value equalization requires Hsv8, got {}", cube.space()),
        ));
    }

    let width = cube.width();
    let height = cube.height();

    let mut value_plane = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = cube.pixel(x, y)[2].round().clamp(0.0, 255.0) as u8;
            value_plane.put_pixel(x, y, image::Luma([v]));
        }
    }

    let equalized = imageproc::contrast::equalize_histogram(&value_plane);

    let data = cube.data_mut();
    for y in 0..height {
        for x in 0..width {
            data[[y as usize, x as usize, 2]] = equalized.get_pixel(x, y)[0] as f32;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(rgb))
    }

    #[test]
    fn test_pure_green_eight_bit() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let cube = converter.convert(&uniform(4, 4, [0, 255, 0])).unwrap();
        assert_eq!(cube.space(), ColorSpace::Hsv8);
        let [h, s, v] = cube.pixel(0, 0);
        assert!((h - 60.0).abs() < 0.01);
        assert!((s - 255.0).abs() < 0.01);
        assert!((v - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_pure_yellow_eight_bit() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let cube = converter.convert(&uniform(2, 2, [255, 255, 0])).unwrap();
        let [h, s, v] = cube.pixel(1, 1);
        assert!((h - 30.0).abs() < 0.01);
        assert!((s - 255.0).abs() < 0.01);
        assert!((v - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_pure_blue_normalized() {
        let converter = ColorSpaceConverter::new(HsvConvention::Normalized);
        let cube = converter.convert(&uniform(2, 2, [0, 0, 255])).unwrap();
        assert_eq!(cube.space(), ColorSpace::HsvNormalized);
        let [h, s, v] = cube.pixel(0, 0);
        assert!((h - 240.0 / 360.0).abs() < 0.001);
        assert!((s - 1.0).abs() < 0.001);
        assert!((v - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_gray_has_zero_hue_and_saturation() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let cube = converter.convert(&uniform(2, 2, [128, 128, 128])).unwrap();
        let [h, s, v] = cube.pixel(0, 0);
        assert_eq!(h, 0.0);
        assert_eq!(s, 0.0);
        assert!((v - 128.0).abs() < 0.5);
    }

    #[test]
    fn test_dark_brown_lands_in_low_hue_band() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let cube = converter.convert(&uniform(2, 2, [80, 40, 20])).unwrap();
        let [h, s, v] = cube.pixel(0, 0);
        assert!((h - 10.0).abs() < 0.1);
        assert!(s > 60.0);
        assert!(v <= 110.0);
    }

    #[test]
    fn test_conversion_stays_in_range() {
        // Sweep a coarse grid of RGB inputs; every sample must stay inside
        // the valid range of its convention.
        for convention in [HsvConvention::EightBit, HsvConvention::Normalized] {
            let converter = ColorSpaceConverter::new(convention);
            for r in (0u16..=255).step_by(51) {
                for g in (0u16..=255).step_by(51) {
                    for b in (0u16..=255).step_by(51) {
                        let img = uniform(1, 1, [r as u8, g as u8, b as u8]);
                        let cube = converter.convert(&img).unwrap();
                        let px = cube.pixel(0, 0);
                        for (channel, &sample) in px.iter().enumerate() {
                            let (min, max) = cube.space().channel_range(channel);
                            assert!(
                                sample >= min && sample <= max,
                                "{:?} channel {} out of range: {}",
                                convention,
                                channel,
                                sample
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_equalize_value_keeps_uniform_frame_uniform() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let mut cube = converter.convert(&uniform(4, 4, [80, 40, 20])).unwrap();
        let hue_before = cube.pixel(0, 0)[0];
        let sat_before = cube.pixel(0, 0)[1];

        equalize_value(&mut cube).unwrap();

        let first = cube.pixel(0, 0);
        assert_eq!(first[0], hue_before);
        assert_eq!(first[1], sat_before);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(cube.pixel(x, y)[2], first[2]);
            }
        }
        let (min, max) = cube.space().channel_range(2);
        assert!(first[2] >= min && first[2] <= max);
    }

    #[test]
    fn test_equalize_value_rejects_non_hsv8() {
        let converter = ColorSpaceConverter::new(HsvConvention::Normalized);
        let mut cube = converter.convert(&uniform(2, 2, [10, 10, 10])).unwrap();
        let err = equalize_value(&mut cube).unwrap_err();
        assert!(matches!(err, RipenessError::Processing { .. }));
    }

    #[test]
    fn test_convert_rejects_zero_area() {
        let converter = ColorSpaceConverter::new(HsvConvention::EightBit);
        let err = converter.convert(&RgbImage::new(0, 3)).unwrap_err();
        assert!(matches!(err, RipenessError::DegenerateInput { .. }));
    }
}
