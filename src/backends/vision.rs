use image::{GrayImage, RgbImage, RgbaImage};
use thiserror::Error;

/// HSV triplets packed into an RGB buffer, OpenCV convention:
/// H in 0..=180, S and V in 0..=255.
pub type HsvImage = RgbImage;

/// Single-channel binary mask (0 or 255 per pixel).
pub type ColorMask = GrayImage;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("vision backend not ready")]
    NotReady,
    #[error("vision operation failed: {0}")]
    Failed(String),
}

/// Optional color-mask image-processing capability. When absent (or not
/// ready within the startup window) the scanner degrades to linear-channel
/// extraction only.
pub trait VisionBackend: Send + Sync {
    /// Whether the backend has finished loading. Polled with a bounded wait
    /// at engine start, never from the tick loop.
    fn is_ready(&self) -> bool;

    fn to_hsv(&self, frame: &RgbaImage) -> Result<HsvImage, VisionError>;

    /// Binary mask of pixels with all HSV components inside `low..=high`.
    fn range_threshold(
        &self,
        hsv: &HsvImage,
        low: [u8; 3],
        high: [u8; 3],
    ) -> Result<ColorMask, VisionError>;

    /// Union of two masks.
    fn combine(&self, a: &ColorMask, b: &ColorMask) -> Result<ColorMask, VisionError>;

    /// Morphological closing then opening with a square kernel, removing
    /// speckle noise and filling small gaps.
    fn morphological_clean(&self, mask: &ColorMask, kernel_size: u32)
        -> Result<ColorMask, VisionError>;
}
