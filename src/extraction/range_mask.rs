use image::{Rgba, RgbaImage};

use crate::backends::{ColorMask, VisionBackend, VisionError};
use crate::models::ColorChannel;

/// HSV threshold bounds per color, OpenCV convention (H in 0..=180).
/// Red needs two disjoint ranges because its hue wraps across 0.
pub mod hsv_bounds {
    pub const RED_LOW_WRAP: [u8; 3] = [0, 50, 50];
    pub const RED_HIGH_WRAP: [u8; 3] = [15, 255, 255];
    pub const RED_LOW_UPPER: [u8; 3] = [165, 50, 50];
    pub const RED_HIGH_UPPER: [u8; 3] = [180, 255, 255];

    pub const GREEN_LOW: [u8; 3] = [40, 40, 40];
    pub const GREEN_HIGH: [u8; 3] = [80, 255, 255];

    pub const BLUE_LOW: [u8; 3] = [100, 40, 40];
    pub const BLUE_HIGH: [u8; 3] = [130, 255, 255];
}

/// Structuring neighborhood for the morphological cleanup.
pub const MORPH_KERNEL_SIZE: u32 = 3;

/// Isolate a color by HSV range thresholding: convert to HSV, threshold
/// against the color's hue bounds, clean the mask (closing then opening,
/// 3×3), and expand it back to a full-channel plane. Requires a vision
/// backend; errors are caught by the dispatcher, which falls back to the
/// linear-channel strategy for the same tick.
pub fn range_mask_plane(
    vision: &dyn VisionBackend,
    frame: &RgbaImage,
    color: ColorChannel,
) -> Result<RgbaImage, VisionError> {
    let hsv = vision.to_hsv(frame)?;

    let mask = match color {
        ColorChannel::Red => {
            let wrap = vision.range_threshold(&hsv, hsv_bounds::RED_LOW_WRAP, hsv_bounds::RED_HIGH_WRAP)?;
            let upper =
                vision.range_threshold(&hsv, hsv_bounds::RED_LOW_UPPER, hsv_bounds::RED_HIGH_UPPER)?;
            vision.combine(&wrap, &upper)?
        }
        ColorChannel::Green => {
            vision.range_threshold(&hsv, hsv_bounds::GREEN_LOW, hsv_bounds::GREEN_HIGH)?
        }
        ColorChannel::Blue => {
            vision.range_threshold(&hsv, hsv_bounds::BLUE_LOW, hsv_bounds::BLUE_HIGH)?
        }
    };

    let cleaned = vision.morphological_clean(&mask, MORPH_KERNEL_SIZE)?;
    Ok(expand_mask(&cleaned))
}

/// Spread a single-channel mask across all three channels, opaque alpha.
fn expand_mask(mask: &ColorMask) -> RgbaImage {
    let mut plane = RgbaImage::new(mask.width(), mask.height());
    for (x, y, pixel) in plane.enumerate_pixels_mut() {
        let v = mask.get_pixel(x, y).0[0];
        *pixel = Rgba([v, v, v, 255]);
    }
    plane
}
