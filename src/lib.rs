//! Multi-color QR scan engine with spoken route guidance.
//!
//! Up to three QR codes, one per color channel, are printed at the same
//! physical location. A [`ScannerEngine`] runs a continuous frame loop that
//! isolates each color plane from the captured image, decodes against each
//! plane with two fallback extraction strategies, accumulates at most one
//! result per color, and narrates navigation guidance as codes are found.
//! Camera, bit decoder, vision library, text-to-speech, and the screen are
//! all injected through the traits in [`backends`].

pub mod backends;
mod config;
mod dispatch;
mod engine;
mod extraction;
mod models;
mod navigation;
mod session;

pub use config::ScannerConfig;
pub use dispatch::{decode_pass, normalize_payload};
pub use engine::{ScannerBackends, ScannerEngine};
pub use extraction::{
    dominant_pixel_count, hsv_bounds, linear_channel_plane, range_mask_plane, MORPH_KERNEL_SIZE,
};
pub use models::{ColorChannel, DecodedResult, ExtractionMethod, Frame, ResultOrigin, ScanRegion};
pub use navigation::{Guidance, LocationNode, NavigationGraph, RouteTable};
pub use session::{ScanSession, ScanStatus};

/// Initialize logging from `RUST_LOG`, defaulting to `info`. Optional
/// convenience for binaries embedding the engine.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();
}
