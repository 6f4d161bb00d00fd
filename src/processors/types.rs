//! Types used in pixel processing operations.
//!
//! The central type is [`ColorCube`], the fixed-layout (height, width, 3)
//! pixel array every stage of the pipeline operates on. A cube carries the
//! [`ColorSpace`] its samples are expressed in so downstream stages can
//! enforce scale pairing instead of guessing.

use crate::core::errors::RipenessError;
use crate::domain::ColorSpace;
use image::RgbImage;
use ndarray::Array3;

/// The two supported HSV output conventions of the color-space converter.
///
/// The conventions are NOT interchangeable: each has its own calibrated
/// threshold tables, and a cube produced under one convention must never be
/// classified under the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HsvConvention {
    /// OpenCV-style integer scale: hue 0-179 (degrees / 2), saturation and
    /// value 0-255.
    EightBit,
    /// Normalized floating scale: all three channels in 0.0-1.0.
    Normalized,
}

impl HsvConvention {
    /// The color space cubes produced under this convention are tagged with.
    pub fn color_space(&self) -> ColorSpace {
        match self {
            HsvConvention::EightBit => ColorSpace::Hsv8,
            HsvConvention::Normalized => ColorSpace::HsvNormalized,
        }
    }
}

/// A fixed-layout pixel array of shape (height, width, 3).
///
/// Samples are stored as f32 in the scale given by `space`. Construction
/// enforces the data-model invariants: three channels, matching spatial
/// dimensions, non-zero area.
#[derive(Debug, Clone)]
pub struct ColorCube {
    space: ColorSpace,
    data: Array3<f32>,
}

impl ColorCube {
    /// Creates a cube from a pre-built array, checking layout invariants.
    ///
    /// # Arguments
    ///
    /// * `space` - The scale the samples are expressed in.
    /// * `data` - Array of shape (height, width, 3).
    ///
    /// # Returns
    ///
    /// The cube, or `DegenerateInput` if the array has zero area or does not
    /// have exactly three channels.
    pub fn new(space: ColorSpace, data: Array3<f32>) -> Result<Self, RipenessError> {
        let (height, width, channels) = data.dim();
        if channels != 3 {
            return Err(RipenessError::degenerate_input(format!(
                "expected 3 channels, got {}",
                channels
            )));
        }
        if height == 0 || width == 0 {
            return Err(RipenessError::degenerate_input(format!(
                "zero-area image ({}x{})",
                width, height
            )));
        }
        Ok(Self { space, data })
    }

    /// Builds an `Rgb8` cube from a decoded image.
    ///
    /// Samples are widened to f32 but keep the 0-255 scale.
    ///
    /// # Arguments
    ///
    /// * `image` - The decoded RGB image.
    ///
    /// # Returns
    ///
    /// The cube, or `DegenerateInput` for a zero-area image.
    pub fn from_rgb(image: &RgbImage) -> Result<Self, RipenessError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RipenessError::degenerate_input(format!(
                "zero-area image ({}x{})",
                width, height
            )));
        }
        let samples: Vec<f32> = image.as_raw().iter().map(|&v| v as f32).collect();
        let data = Array3::from_shape_vec((height as usize, width as usize, 3), samples)?;
        Self::new(ColorSpace::Rgb8, data)
    }

    /// The scale the cube's samples are expressed in.
    pub fn space(&self) -> ColorSpace {
        self.space
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.data.dim().0 * self.data.dim().1
    }

    /// Returns the three samples of the pixel at (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let (y, x) = (y as usize, x as usize);
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    /// Mean of one channel over the whole frame.
    ///
    /// # Arguments
    ///
    /// * `channel` - Channel index (0, 1, or 2).
    pub fn channel_mean(&self, channel: usize) -> f32 {
        debug_assert!(channel < 3);
        let mut sum = 0.0f64;
        for value in self.data.index_axis(ndarray::Axis(2), channel).iter() {
            sum += *value as f64;
        }
        (sum / self.pixel_count() as f64) as f32
    }

    /// Read access to the underlying array.
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// Mutable access to the underlying array.
    ///
    /// The caller must preserve the scale invariant of `space`.
    pub(crate) fn data_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_from_rgb_layout() {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(2, 1, Rgb([10, 20, 30]));
        let cube = ColorCube::from_rgb(&img).unwrap();
        assert_eq!(cube.width(), 3);
        assert_eq!(cube.height(), 2);
        assert_eq!(cube.pixel_count(), 6);
        assert_eq!(cube.pixel(2, 1), [10.0, 20.0, 30.0]);
        assert_eq!(cube.pixel(0, 0), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_from_rgb_rejects_zero_area() {
        let img = RgbImage::new(0, 4);
        let err = ColorCube::from_rgb(&img).unwrap_err();
        assert!(matches!(err, RipenessError::DegenerateInput { .. }));
    }

    #[test]
    fn test_new_rejects_wrong_channel_count() {
        let data = Array3::<f32>::zeros((2, 2, 4));
        let err = ColorCube::new(ColorSpace::Rgb8, data).unwrap_err();
        assert!(matches!(err, RipenessError::DegenerateInput { .. }));
    }

    #[test]
    fn test_channel_mean_uniform() {
        let img = RgbImage::from_pixel(4, 4, Rgb([8, 16, 32]));
        let cube = ColorCube::from_rgb(&img).unwrap();
        assert_eq!(cube.channel_mean(0), 8.0);
        assert_eq!(cube.channel_mean(1), 16.0);
        assert_eq!(cube.channel_mean(2), 32.0);
    }

    #[test]
    fn test_convention_to_color_space() {
        assert_eq!(HsvConvention::EightBit.color_space(), ColorSpace::Hsv8);
        assert_eq!(
            HsvConvention::Normalized.color_space(),
            ColorSpace::HsvNormalized
        );
    }
}
