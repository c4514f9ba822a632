/// Text-to-speech seam. Fire-and-forget and best-effort: implementations
/// cancel any in-flight utterance before starting a new one; utterances
/// never queue.
pub trait NarrationBackend: Send + Sync {
    fn speak(&self, text: &str);
}
