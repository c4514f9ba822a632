//! Per-frame decode pass: for every color still missing, run the extraction
//! strategy chain and attempt a decode, stopping at the first success for
//! that color. Pure apart from logging; committing results is the caller's
//! job.

use log::{debug, warn};

use crate::backends::{DecodeBackend, DecodeOptions, VisionBackend};
use crate::extraction::{dominant_pixel_count, linear_channel_plane, range_mask_plane};
use crate::models::{ColorChannel, DecodedResult, ExtractionMethod, Frame, ResultOrigin};
use crate::navigation::NavigationGraph;

/// Strip all whitespace (leading, trailing, and internal) from a decoder
/// payload.
pub fn normalize_payload(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Attempt extraction + decode for every color not in `already_found`.
/// Returns only newly discovered results, never more than the number of
/// colors still missing. A failure while processing one color never
/// prevents the remaining colors from being attempted.
pub fn decode_pass(
    frame: &Frame,
    already_found: &[ColorChannel],
    graph: &NavigationGraph,
    decoder: &dyn DecodeBackend,
    vision: Option<&dyn VisionBackend>,
) -> Vec<DecodedResult> {
    let mut discovered = Vec::new();

    for color in ColorChannel::ALL {
        if already_found.contains(&color) {
            continue;
        }
        if let Some(result) = decode_color(frame, color, graph, decoder, vision) {
            debug!(
                "decoded {} code {:?} via {}",
                color,
                result.code,
                result.method.as_str()
            );
            discovered.push(result);
        }
    }

    discovered
}

/// Strategy chain for one color: range-mask when a vision backend is
/// present, linear-channel as the fallback. A vision error is caught here
/// and falls through to the fallback within the same tick.
fn decode_color(
    frame: &Frame,
    color: ColorChannel,
    graph: &NavigationGraph,
    decoder: &dyn DecodeBackend,
    vision: Option<&dyn VisionBackend>,
) -> Option<DecodedResult> {
    let opts = DecodeOptions::default();

    if let Some(vision) = vision {
        match range_mask_plane(vision, frame.pixels(), color) {
            Ok(plane) => {
                if let Some(raw) = decoder.decode(&plane, opts) {
                    if let Some(result) = build_result(color, &raw, ExtractionMethod::RangeMask, graph)
                    {
                        return Some(result);
                    }
                }
            }
            Err(err) => {
                warn!("range-mask extraction failed for {color}: {err}");
            }
        }
    }

    let plane = linear_channel_plane(frame.pixels(), color);
    debug!(
        "{} linear plane: {} dominant pixels",
        color,
        dominant_pixel_count(frame.pixels(), color)
    );
    decoder
        .decode(&plane, opts)
        .and_then(|raw| build_result(color, &raw, ExtractionMethod::LinearChannel, graph))
}

fn build_result(
    color: ColorChannel,
    raw: &str,
    method: ExtractionMethod,
    graph: &NavigationGraph,
) -> Option<DecodedResult> {
    let code = normalize_payload(raw);
    if code.is_empty() {
        return None;
    }

    let origin = match graph.lookup(color, &code) {
        Some(node) => ResultOrigin::Matched {
            display_text: node.text.clone(),
            voice_text: node.voice.clone(),
            category: node.category.clone(),
            next_code: node.next.clone(),
        },
        None => ResultOrigin::Unknown,
    };

    Some(DecodedResult {
        color,
        code,
        method,
        origin,
    })
}
