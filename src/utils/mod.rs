//! Utility functions for the ripeness pipeline.
//!
//! This module provides the image loading and decoding utilities used by the
//! pipeline and its callers.

pub mod image;

pub use image::{
    create_rgb_image, decode_image, dynamic_to_rgb, load_image, load_images_batch,
    load_images_batch_with_threshold, resize_to_canvas, SourceFormat,
};
