use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{error, info};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::dispatch::decode_pass;
use crate::models::{ColorChannel, DecodedResult, ScanRegion};
use crate::session::{ScanSession, ScanStatus};

use super::controller::EngineShared;

/// Drives the per-frame cadence: grab, crop, dispatch, commit, check for a
/// terminal state. One decode pass in flight at a time; a due tick that
/// finds the busy guard held is dropped entirely, never queued.
pub(crate) async fn scan_loop(
    shared: Arc<EngineShared>,
    region: ScanRegion,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(shared.config.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // latest guidance line shown on the overlay, carried across ticks
    let mut guidance_line: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if shared.decode_busy.swap(true, Ordering::AcqRel) {
                    continue;
                }

                let terminal = match run_tick(&shared, region, &mut guidance_line).await {
                    Ok(reached_terminal) => reached_terminal,
                    Err(err) => {
                        error!("scan tick failed: {err:?}");
                        false
                    }
                };

                release_busy_after_throttle(&shared);

                if terminal {
                    shared.backends.capture.release_stream();
                    info!("scan session finished; capture released");
                    break;
                }
            }
            _ = cancel_token.cancelled() => {
                info!("scan loop shutting down");
                break;
            }
        }
    }
}

/// The busy guard stays held for the throttle window after a dispatch
/// completes, bounding decode frequency independently of the tick cadence.
fn release_busy_after_throttle(shared: &Arc<EngineShared>) {
    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        tokio::time::sleep(shared.config.throttle_window()).await;
        shared.decode_busy.store(false, Ordering::Release);
    });
}

async fn run_tick(
    shared: &Arc<EngineShared>,
    region: ScanRegion,
    guidance_line: &mut Option<String>,
) -> Result<bool> {
    let capture = Arc::clone(&shared.backends.capture);
    let frame = tokio::task::spawn_blocking(move || capture.current_frame())
        .await
        .context("frame capture worker join failed")?
        .context("frame capture failed")?;
    let cropped = frame.crop(region);

    let already_found = shared.session.lock().await.found_colors();

    // decode is CPU-bound; run it off the scheduler
    let worker = Arc::clone(shared);
    let discovered = tokio::task::spawn_blocking(move || {
        decode_pass(
            &cropped,
            &already_found,
            &worker.graph,
            worker.backends.decoder.as_ref(),
            worker.vision_if_ready(),
        )
    })
    .await
    .context("decode worker join failed")?;

    let mut session = shared.session.lock().await;
    let mut newly_recorded: Vec<DecodedResult> = Vec::new();
    for result in discovered {
        if session.record_result(result.clone()) {
            if result.is_matched() {
                if let Some(guidance) = shared.graph.guidance_for(result.color, &result.code) {
                    *guidance_line = Some(guidance.overlay_line());
                }
                shared.backends.narration.speak(&result.voice_text());
            }
            newly_recorded.push(result);
        }
    }

    present_progress(shared, &session, guidance_line.as_deref(), &newly_recorded);

    match session.evaluate_transition() {
        ScanStatus::Active => Ok(false),
        ScanStatus::Complete => {
            let presentation = &shared.backends.presentation;
            presentation.set_status("All colors decoded successfully");
            presentation.set_overlay("Complete! All QR codes found.");
            shared.backends.narration.speak("All QR codes successfully detected");
            info!(
                "session {} complete after {:.1}s",
                session.id(),
                session.elapsed().as_secs_f32()
            );
            Ok(true)
        }
        ScanStatus::TimedOut => {
            let found = session.found_colors().len();
            let presentation = &shared.backends.presentation;
            presentation.set_status(&format!("Scan timeout - found {found}/3 colors"));
            presentation.set_overlay("Scan completed (timeout)");
            shared.backends.narration.speak("Scan completed");
            info!("session {} timed out with {found}/3 colors", session.id());
            Ok(true)
        }
    }
}

/// Per-tick status line, overlay, results listing, and the spoken
/// announcement for each mid-session find.
fn present_progress(
    shared: &EngineShared,
    session: &ScanSession,
    guidance_line: Option<&str>,
    newly_recorded: &[DecodedResult],
) {
    let presentation = &shared.backends.presentation;
    let elapsed = session.elapsed().as_secs_f32();
    let found = session.found_colors();

    if found.is_empty() {
        presentation.set_status(&format!("Scanning... ({elapsed:.1}s)"));
    } else if found.len() < ColorChannel::ALL.len() {
        presentation.set_status(&format!(
            "Found {}/3 colors - Missing: {} ({elapsed:.1}s)",
            found.len(),
            join_colors(&session.missing_colors()),
        ));

        let mut overlay = guidance_line
            .unwrap_or("Looking for all color QR codes...")
            .to_string();
        overlay.push_str(&format!("\nFound: {}", join_colors(&found)));
        presentation.set_overlay(&overlay);

        for result in newly_recorded {
            shared
                .backends
                .narration
                .speak(&format!("{} QR found: {}", result.color, result.voice_text()));
        }
    }

    if !session.results().is_empty() {
        presentation.show_results(session.results());
    }
}

fn join_colors(colors: &[ColorChannel]) -> String {
    colors
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
