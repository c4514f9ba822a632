use image::{Rgba, RgbaImage};

use crate::models::ColorChannel;

/// Collapse a frame onto one channel: every output pixel carries the target
/// channel's raw intensity in all three channels. Always available, no
/// external dependency.
pub fn linear_channel_plane(frame: &RgbaImage, color: ColorChannel) -> RgbaImage {
    let mut plane = frame.clone();
    for pixel in plane.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let intensity = match color {
            ColorChannel::Red => r,
            ColorChannel::Green => g,
            ColorChannel::Blue => b,
        };
        *pixel = Rgba([intensity, intensity, intensity, a]);
    }
    plane
}

/// Count of pixels where the target channel strictly dominates the other two
/// and exceeds a noise floor. Diagnostic only.
pub fn dominant_pixel_count(frame: &RgbaImage, color: ColorChannel) -> usize {
    const NOISE_FLOOR: u8 = 50;
    frame
        .pixels()
        .filter(|pixel| {
            let [r, g, b, _] = pixel.0;
            match color {
                ColorChannel::Red => r > g && r > b && r > NOISE_FLOOR,
                ColorChannel::Green => g > r && g > b && g > NOISE_FLOOR,
                ColorChannel::Blue => b > r && b > g && b > NOISE_FLOOR,
            }
        })
        .count()
}
