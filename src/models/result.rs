use serde::{Deserialize, Serialize};

use super::ColorChannel;

/// Which extraction strategy produced the plane the code was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionMethod {
    RangeMask,
    LinearChannel,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::RangeMask => "range-mask",
            ExtractionMethod::LinearChannel => "linear-channel",
        }
    }
}

/// Where a decoded code landed in the navigation graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum ResultOrigin {
    /// The code resolved to a location node; guidance fields come from it.
    Matched {
        display_text: String,
        voice_text: String,
        category: String,
        next_code: Option<String>,
    },
    /// Decoded cleanly but absent from the route table. Still informative.
    Unknown,
}

/// One decoded code. Produced at most once per color per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedResult {
    pub color: ColorChannel,
    /// Decoder payload with all whitespace stripped.
    pub code: String,
    pub method: ExtractionMethod,
    pub origin: ResultOrigin,
}

impl DecodedResult {
    pub fn is_matched(&self) -> bool {
        matches!(self.origin, ResultOrigin::Matched { .. })
    }

    pub fn display_text(&self) -> String {
        match &self.origin {
            ResultOrigin::Matched { display_text, .. } => display_text.clone(),
            ResultOrigin::Unknown => format!(
                "Unknown {} QR: {}",
                self.color.as_str().to_uppercase(),
                self.code
            ),
        }
    }

    pub fn voice_text(&self) -> String {
        match &self.origin {
            ResultOrigin::Matched { voice_text, .. } => voice_text.clone(),
            ResultOrigin::Unknown => format!("Unknown {} QR code detected", self.color),
        }
    }

    pub fn next_code(&self) -> Option<&str> {
        match &self.origin {
            ResultOrigin::Matched { next_code, .. } => next_code.as_deref(),
            ResultOrigin::Unknown => None,
        }
    }
}
