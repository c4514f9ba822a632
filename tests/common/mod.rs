#![allow(dead_code)]

//! Shared fakes for the integration suites: an in-memory camera, a decoder
//! that reads payload bytes out of row 0 of a channel-collapsed plane, and
//! recording narration/presentation sinks.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use image::{Luma, RgbaImage};

use wayscan::backends::{
    CaptureBackend, CaptureError, ColorMask, DecodeBackend, DecodeOptions, FacingPreference,
    HsvImage, NarrationBackend, PresentationSurface, VisionBackend, VisionError,
};
use wayscan::{hsv_bounds, ColorChannel, DecodedResult, Frame};

fn channel_index(color: ColorChannel) -> usize {
    match color {
        ColorChannel::Red => 0,
        ColorChannel::Green => 1,
        ColorChannel::Blue => 2,
    }
}

/// A square frame whose row-0 pixels carry payload bytes in the given color
/// channels. A composite frame (multiple payloads) is unreadable until a
/// plane extraction collapses it onto one channel.
pub fn payload_frame(size: u32, specs: &[(ColorChannel, &str)]) -> Frame {
    let mut pixels = RgbaImage::new(size, size);
    for pixel in pixels.pixels_mut() {
        pixel.0[3] = 255;
    }
    for (color, payload) in specs {
        for (i, byte) in payload.bytes().enumerate() {
            pixels.get_pixel_mut(i as u32, 0).0[channel_index(*color)] = byte;
        }
    }
    Frame::new(pixels)
}

/// Dark-on-light variant: payload bytes stored inverted in one channel,
/// with the rest of row 0 saturated so the terminator only appears after
/// polarity inversion.
pub fn inverted_payload_frame(size: u32, color: ColorChannel, payload: &str) -> Frame {
    let mut pixels = RgbaImage::new(size, size);
    for pixel in pixels.pixels_mut() {
        pixel.0[3] = 255;
    }
    let idx = channel_index(color);
    for x in 0..size {
        pixels.get_pixel_mut(x, 0).0[idx] = 255;
    }
    for (i, byte) in payload.bytes().enumerate() {
        pixels.get_pixel_mut(i as u32, 0).0[idx] = 255 - byte;
    }
    Frame::new(pixels)
}

/// Reads printable-ASCII payload bytes from row 0 of a plane, refusing any
/// plane that is not channel-collapsed gray. Decode success therefore
/// genuinely depends on color plane extraction.
pub struct RowByteDecoder;

impl RowByteDecoder {
    fn parse_row(plane: &RgbaImage, invert: bool) -> Option<String> {
        if plane.height() == 0 {
            return None;
        }
        let mut bytes = Vec::new();
        for x in 0..plane.width() {
            let [r, g, b, _] = plane.get_pixel(x, 0).0;
            if r != g || g != b {
                return None;
            }
            let v = if invert { 255 - r } else { r };
            if v == 0 {
                return if bytes.is_empty() {
                    None
                } else {
                    String::from_utf8(bytes).ok()
                };
            }
            if !(0x20..=0x7e).contains(&v) {
                return None;
            }
            bytes.push(v);
        }
        None
    }
}

impl DecodeBackend for RowByteDecoder {
    fn decode(&self, plane: &RgbaImage, opts: DecodeOptions) -> Option<String> {
        Self::parse_row(plane, false).or_else(|| {
            if opts.try_both_polarities {
                Self::parse_row(plane, true)
            } else {
                None
            }
        })
    }
}

/// In-memory camera with acquire/release bookkeeping. Double-acquire is an
/// error so leaked streams show up in tests.
pub struct TestCapture {
    frame: Mutex<Frame>,
    live: AtomicBool,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    deny: bool,
}

impl TestCapture {
    pub fn with_frame(frame: Frame) -> Arc<Self> {
        Arc::new(Self {
            frame: Mutex::new(frame),
            live: AtomicBool::new(false),
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            deny: false,
        })
    }

    pub fn denying() -> Arc<Self> {
        Arc::new(Self {
            frame: Mutex::new(Frame::new(RgbaImage::new(1, 1))),
            live: AtomicBool::new(false),
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            deny: true,
        })
    }

    pub fn set_frame(&self, frame: Frame) {
        *self.frame.lock().unwrap() = frame;
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

impl CaptureBackend for TestCapture {
    fn acquire_stream(&self, _facing: FacingPreference) -> Result<(), CaptureError> {
        if self.deny {
            return Err(CaptureError::Denied);
        }
        if self.live.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::Failed("stream already acquired".into()));
        }
        self.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn current_frame(&self) -> Result<Frame, CaptureError> {
        if !self.live.load(Ordering::SeqCst) {
            return Err(CaptureError::Unavailable("no live stream".into()));
        }
        Ok(self.frame.lock().unwrap().clone())
    }

    fn release_stream(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
pub struct RecordingNarrator {
    utterances: Mutex<Vec<String>>,
}

impl RecordingNarrator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn utterances(&self) -> Vec<String> {
        self.utterances.lock().unwrap().clone()
    }
}

impl NarrationBackend for RecordingNarrator {
    fn speak(&self, text: &str) {
        self.utterances.lock().unwrap().push(text.to_string());
    }
}

#[derive(Default)]
pub struct RecordingSurface {
    statuses: Mutex<Vec<String>>,
    overlays: Mutex<Vec<String>>,
    results: Mutex<Vec<Vec<DecodedResult>>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap().clone()
    }

    pub fn last_status(&self) -> Option<String> {
        self.statuses.lock().unwrap().last().cloned()
    }

    pub fn last_overlay(&self) -> Option<String> {
        self.overlays.lock().unwrap().last().cloned()
    }

    pub fn last_results(&self) -> Vec<DecodedResult> {
        self.results.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl PresentationSurface for RecordingSurface {
    fn set_status(&self, text: &str) {
        self.statuses.lock().unwrap().push(text.to_string());
    }

    fn set_overlay(&self, text: &str) {
        self.overlays.lock().unwrap().push(text.to_string());
    }

    fn show_results(&self, results: &[DecodedResult]) {
        self.results.lock().unwrap().push(results.to_vec());
    }
}

/// Vision backend whose every operation fails; exercises the per-color
/// fallback to linear-channel extraction.
pub struct FailingVision;

impl VisionBackend for FailingVision {
    fn is_ready(&self) -> bool {
        true
    }

    fn to_hsv(&self, _frame: &RgbaImage) -> Result<HsvImage, VisionError> {
        Err(VisionError::Failed("hsv conversion failed".into()))
    }

    fn range_threshold(
        &self,
        _hsv: &HsvImage,
        _low: [u8; 3],
        _high: [u8; 3],
    ) -> Result<ColorMask, VisionError> {
        Err(VisionError::Failed("threshold failed".into()))
    }

    fn combine(&self, _a: &ColorMask, _b: &ColorMask) -> Result<ColorMask, VisionError> {
        Err(VisionError::Failed("combine failed".into()))
    }

    fn morphological_clean(
        &self,
        _mask: &ColorMask,
        _kernel_size: u32,
    ) -> Result<ColorMask, VisionError> {
        Err(VisionError::Failed("morphology failed".into()))
    }
}

/// Vision backend that answers each color's range threshold with a mask
/// already carrying that color's payload bytes in row 0.
pub struct PayloadVision {
    payloads: Vec<(ColorChannel, String)>,
}

impl PayloadVision {
    pub fn new(payloads: &[(ColorChannel, &str)]) -> Arc<Self> {
        Arc::new(Self {
            payloads: payloads
                .iter()
                .map(|(c, p)| (*c, p.to_string()))
                .collect(),
        })
    }
}

impl VisionBackend for PayloadVision {
    fn is_ready(&self) -> bool {
        true
    }

    fn to_hsv(&self, frame: &RgbaImage) -> Result<HsvImage, VisionError> {
        Ok(HsvImage::new(frame.width(), frame.height()))
    }

    fn range_threshold(
        &self,
        hsv: &HsvImage,
        low: [u8; 3],
        _high: [u8; 3],
    ) -> Result<ColorMask, VisionError> {
        let color = if low == hsv_bounds::RED_LOW_WRAP {
            Some(ColorChannel::Red)
        } else if low == hsv_bounds::GREEN_LOW {
            Some(ColorChannel::Green)
        } else if low == hsv_bounds::BLUE_LOW {
            Some(ColorChannel::Blue)
        } else {
            // red's upper wraparound half contributes nothing here
            None
        };

        let mut mask = ColorMask::new(hsv.width(), hsv.height());
        if let Some(color) = color {
            if let Some((_, payload)) = self.payloads.iter().find(|(c, _)| *c == color) {
                for (i, byte) in payload.bytes().enumerate() {
                    mask.put_pixel(i as u32, 0, Luma([byte]));
                }
            }
        }
        Ok(mask)
    }

    fn combine(&self, a: &ColorMask, b: &ColorMask) -> Result<ColorMask, VisionError> {
        let mut out = a.clone();
        for (x, y, pixel) in out.enumerate_pixels_mut() {
            pixel.0[0] = pixel.0[0].max(b.get_pixel(x, y).0[0]);
        }
        Ok(out)
    }

    fn morphological_clean(
        &self,
        mask: &ColorMask,
        _kernel_size: u32,
    ) -> Result<ColorMask, VisionError> {
        Ok(mask.clone())
    }
}
