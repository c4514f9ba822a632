use image::RgbaImage;

/// Options forwarded to the underlying bit decoder.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Attempt both light-on-dark and dark-on-light polarity. Finder
    /// patterns can appear either way after color isolation.
    pub try_both_polarities: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            try_both_polarities: true,
        }
    }
}

/// Wraps an external decode-from-pixels primitive.
///
/// A malformed or unreadable pattern is indistinguishable from absence:
/// both are `None`, and the dispatcher never retries within a tick. Payloads
/// are returned raw; normalization is the dispatcher's job.
pub trait DecodeBackend: Send + Sync {
    fn decode(&self, plane: &RgbaImage, opts: DecodeOptions) -> Option<String>;
}
