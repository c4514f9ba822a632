use chrono::{DateTime, Utc};
use image::{imageops, RgbaImage};
use serde::{Deserialize, Serialize};

/// The square sub-rectangle of the full frame that is searched for codes.
/// Fixed for a session once the camera dimensions are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRegion {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl ScanRegion {
    /// Center a square of `size` pixels in a frame, shrinking it to fit
    /// small frames.
    pub fn centered(frame_width: u32, frame_height: u32, size: u32) -> Self {
        let size = size.min(frame_width).min(frame_height);
        Self {
            x: (frame_width - size) / 2,
            y: (frame_height - size) / 2,
            size,
        }
    }
}

/// An immutable RGBA pixel buffer captured once per loop tick.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: RgbaImage,
    captured_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels,
            captured_at: Utc::now(),
        }
    }

    /// Build a frame from a raw RGBA byte buffer. Returns `None` when the
    /// buffer does not match the given dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, data).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// Copy out the scan region as a new frame. The region is clamped to the
    /// frame bounds; the source frame is never touched.
    pub fn crop(&self, region: ScanRegion) -> Frame {
        let x = region.x.min(self.width().saturating_sub(1));
        let y = region.y.min(self.height().saturating_sub(1));
        let w = region.size.min(self.width() - x);
        let h = region.size.min(self.height() - y);
        Frame {
            pixels: imageops::crop_imm(&self.pixels, x, y, w, h).to_image(),
            captured_at: self.captured_at,
        }
    }
}
