//! Utility functions for image loading and decoding.
//!
//! This module provides functions for decoding uploaded byte streams,
//! loading single or batch images from files, deterministic canvas resizing,
//! and creating images from raw data. Alpha channels are dropped during
//! decoding and color-profile metadata is uniformly ignored, so the same
//! bytes always produce the same pixel data.

use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::RipenessError;
use image::{imageops, DynamicImage, ImageFormat, RgbImage};
use std::str::FromStr;
use tracing::warn;

/// The supported source formats for uploaded image bytes.
///
/// Acts as the MIME-ish type hint supplied alongside an upload; parsing
/// accepts the common lowercase/uppercase extension spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SourceFormat {
    /// JPEG bytes (`jpg` / `jpeg`).
    Jpeg,
    /// PNG bytes (`png`).
    Png,
}

impl From<SourceFormat> for ImageFormat {
    fn from(format: SourceFormat) -> Self {
        match format {
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Png => ImageFormat::Png,
        }
    }
}

/// Implementation of FromStr for SourceFormat to parse type hints.
impl FromStr for SourceFormat {
    type Err = RipenessError;

    /// Parses a type hint into a SourceFormat variant.
    ///
    /// # Arguments
    /// * `hint` - A string slice containing `jpg`, `jpeg`, or `png` (any case)
    ///
    /// # Returns
    /// * `Ok(SourceFormat)` - If the hint names a supported format
    /// * `Err(RipenessError::InvalidInput)` - For any other hint
    fn from_str(hint: &str) -> Result<Self, Self::Err> {
        match hint.trim().to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(SourceFormat::Jpeg),
            "png" => Ok(SourceFormat::Png),
            other => Err(RipenessError::invalid_input(format!(
                "unsupported image type hint: '{}'",
                other
            ))),
        }
    }
}

/// Converts a DynamicImage to an RgbImage, dropping any alpha channel.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Rejects images with zero area before they reach aggregation.
fn ensure_non_degenerate(img: &RgbImage) -> Result<(), RipenessError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(RipenessError::degenerate_input(format!(
            "zero-area image ({}x{})",
            width, height
        )));
    }
    Ok(())
}

/// Decodes an uploaded byte stream into an RGB image.
///
/// When a format hint is supplied the matching decoder is tried first; if it
/// rejects the bytes the loader falls back to content sniffing before giving
/// up, so a mislabeled upload still decodes. Without a hint the format is
/// sniffed from the bytes.
///
/// # Arguments
///
/// * `bytes` - The raw encoded image bytes (JPEG or PNG).
/// * `hint` - Optional declared source format.
///
/// # Returns
///
/// * `Ok(RgbImage)` - The decoded image with alpha dropped.
/// * `Err(RipenessError::Decode)` - The bytes are not a decodable image.
/// * `Err(RipenessError::DegenerateInput)` - The image has zero area.
pub fn decode_image(bytes: &[u8], hint: Option<SourceFormat>) -> Result<RgbImage, RipenessError> {
    let decoded = match hint {
        Some(format) => match image::load_from_memory_with_format(bytes, format.into()) {
            Ok(img) => img,
            Err(err) => {
                warn!(
                    ?format,
                    "declared format rejected the bytes ({}), falling back to sniffing", err
                );
                image::load_from_memory(bytes).map_err(RipenessError::Decode)?
            }
        },
        None => image::load_from_memory(bytes).map_err(RipenessError::Decode)?,
    };

    let rgb = dynamic_to_rgb(decoded);
    ensure_non_degenerate(&rgb)?;
    Ok(rgb)
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// # Arguments
///
/// * `path` - A reference to the path of the image file to load
///
/// # Returns
///
/// * `Ok(RgbImage)` - The loaded and converted RGB image
/// * `Err(RipenessError)` - An error if the image could not be loaded
///
/// # Errors
///
/// Returns a `RipenessError::Decode` error if the image cannot be loaded
/// from the specified path, or `DegenerateInput` for a zero-area image.
pub fn load_image(path: &std::path::Path) -> Result<RgbImage, RipenessError> {
    let img = image::open(path).map_err(RipenessError::Decode)?;
    let rgb = dynamic_to_rgb(img);
    ensure_non_degenerate(&rgb)?;
    Ok(rgb)
}

/// Loads a batch of images from file paths.
///
/// Uses parallel loading when the number of images exceeds the default
/// parallel threshold.
///
/// # Arguments
///
/// * `paths` - A slice of paths to the image files to load
///
/// # Returns
///
/// * `Ok(Vec<RgbImage>)` - A vector of loaded RGB images
/// * `Err(RipenessError)` - An error if any image could not be loaded
pub fn load_images_batch<P: AsRef<std::path::Path> + Send + Sync>(
    paths: &[P],
) -> Result<Vec<RgbImage>, RipenessError> {
    load_images_batch_with_threshold(paths, None)
}

/// Loads a batch of images from file paths with a custom parallel threshold.
///
/// # Arguments
///
/// * `paths` - A slice of paths to the image files to load
/// * `parallel_threshold` - An optional threshold for parallel loading.
///   If `None`, `DEFAULT_PARALLEL_THRESHOLD` is used.
///
/// # Returns
///
/// * `Ok(Vec<RgbImage>)` - A vector of loaded RGB images
/// * `Err(RipenessError)` - An error if any image could not be loaded
pub fn load_images_batch_with_threshold<P: AsRef<std::path::Path> + Send + Sync>(
    paths: &[P],
    parallel_threshold: Option<usize>,
) -> Result<Vec<RgbImage>, RipenessError> {
    let threshold = parallel_threshold.unwrap_or(DEFAULT_PARALLEL_THRESHOLD);

    if paths.len() > threshold {
        use rayon::prelude::*;
        paths.par_iter().map(|p| load_image(p.as_ref())).collect()
    } else {
        paths.iter().map(|p| load_image(p.as_ref())).collect()
    }
}

/// Creates an RgbImage from raw pixel data.
///
/// The data must be in RGB format (3 bytes per pixel) and the length must
/// match the specified width and height.
///
/// # Arguments
///
/// * `width` - The width of the image in pixels
/// * `height` - The height of the image in pixels
/// * `data` - A vector containing the raw pixel data (RGB format)
///
/// # Returns
///
/// * `Some(RgbImage)` - The created RGB image if the data is valid
/// * `None` - If the data length doesn't match the specified dimensions
pub fn create_rgb_image(width: u32, height: u32, data: Vec<u8>) -> Option<RgbImage> {
    if data.len() != (width * height * 3) as usize {
        return None;
    }

    image::ImageBuffer::from_raw(width, height, data)
}

/// Deterministically resizes an image to a fixed canvas size.
///
/// Uses the Lanczos3 filter so repeated runs over the same input produce
/// identical pixels. Intended for pipeline variants that require a
/// consistent processing resolution regardless of upload size.
///
/// # Arguments
///
/// * `img` - The image to resize.
/// * `width` - Target canvas width.
/// * `height` - Target canvas height.
pub fn resize_to_canvas(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(img, width, height, imageops::FilterType::Lanczos3)
}
