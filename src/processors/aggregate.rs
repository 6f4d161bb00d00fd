//! Channel aggregation over masked pixels.
//!
//! Reduces a pixel cube to three per-channel means, counting only pixels the
//! subject mask selects. The zero-selection case is guarded explicitly and
//! reported as `None` so an empty mask can surface as a "no subject detected"
//! outcome instead of a NaN mean or a spurious classification.

use crate::core::errors::RipenessError;
use crate::domain::ChannelMeans;
use crate::processors::mask::SubjectMask;
use crate::processors::types::ColorCube;

/// Computes per-channel means over the pixels selected by the mask.
///
/// # Arguments
///
/// * `cube` - The pixel cube to aggregate.
/// * `mask` - The subject mask; must have the cube's dimensions. Pass
///   [`SubjectMask::all_on`] to aggregate over the whole frame.
///
/// # Returns
///
/// * `Ok(Some(means))` - Means over the selected pixels, tagged with the
///   cube's color space.
/// * `Ok(None)` - The mask selects zero pixels.
/// * `Err(RipenessError)` - Mask and cube dimensions disagree.
pub fn masked_channel_means(
    cube: &ColorCube,
    mask: &SubjectMask,
) -> Result<Option<ChannelMeans>, RipenessError> {
    if mask.width() != cube.width() || mask.height() != cube.height() {
        return Err(RipenessError::invalid_input(format!(
            "mask dimensions {}x{} do not match image dimensions {}x{}",
            mask.width(),
            mask.height(),
            cube.width(),
            cube.height()
        )));
    }

    let mut sums = [0.0f64; 3];
    let mut selected = 0usize;

    for y in 0..cube.height() {
        for x in 0..cube.width() {
            if !mask.is_selected(x, y) {
                continue;
            }
            let px = cube.pixel(x, y);
            for c in 0..3 {
                sums[c] += px[c] as f64;
            }
            selected += 1;
        }
    }

    // Guard the empty selection before dividing.
    if selected == 0 {
        return Ok(None);
    }

    let values = [
        (sums[0] / selected as f64) as f32,
        (sums[1] / selected as f64) as f32,
        (sums[2] / selected as f64) as f32,
    ];

    Ok(Some(ChannelMeans {
        space: cube.space(),
        values,
        selected_pixels: selected,
        total_pixels: cube.pixel_count(),
    }))
}
