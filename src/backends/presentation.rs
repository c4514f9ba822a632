use crate::models::DecodedResult;

/// Status text, overlay text, and the results listing. Write-only from the
/// core's perspective: nothing shown here feeds back into scan logic.
pub trait PresentationSurface: Send + Sync {
    fn set_status(&self, text: &str);

    fn set_overlay(&self, text: &str);

    /// The accumulated results in discovery order, re-sent after each change.
    fn show_results(&self, results: &[DecodedResult]);
}
