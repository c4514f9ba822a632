//! Seams to the external collaborators: camera, bit decoder, vision
//! library, text-to-speech, and the presentation surface. All are injected
//! once at engine construction.

mod capture;
mod decode;
mod narration;
mod presentation;
mod vision;

pub use capture::{CaptureBackend, CaptureError, FacingPreference};
pub use decode::{DecodeBackend, DecodeOptions};
pub use narration::NarrationBackend;
pub use presentation::PresentationSurface;
pub use vision::{ColorMask, HsvImage, VisionBackend, VisionError};
