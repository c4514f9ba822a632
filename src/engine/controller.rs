use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::{info, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::backends::{
    CaptureBackend, CaptureError, DecodeBackend, NarrationBackend, PresentationSurface,
    VisionBackend,
};
use crate::config::ScannerConfig;
use crate::models::ScanRegion;
use crate::navigation::NavigationGraph;
use crate::session::{ScanSession, ScanStatus};

use super::loop_worker::scan_loop;

/// The external collaborators, injected once at construction.
pub struct ScannerBackends {
    pub capture: Arc<dyn CaptureBackend>,
    pub decoder: Arc<dyn DecodeBackend>,
    /// Optional capability; absence degrades to linear-channel-only mode.
    pub vision: Option<Arc<dyn VisionBackend>>,
    pub narration: Arc<dyn NarrationBackend>,
    pub presentation: Arc<dyn PresentationSurface>,
}

/// State shared between the engine handle and the spawned scan loop.
pub(crate) struct EngineShared {
    pub(crate) config: ScannerConfig,
    pub(crate) graph: NavigationGraph,
    pub(crate) backends: ScannerBackends,
    pub(crate) session: Mutex<ScanSession>,
    /// Single-flight guard for decode passes; held through the throttle
    /// window after each dispatch.
    pub(crate) decode_busy: AtomicBool,
    /// Latched once at startup; never re-detected in the hot path.
    vision_ready: AtomicBool,
}

impl EngineShared {
    pub(crate) fn vision_if_ready(&self) -> Option<&dyn VisionBackend> {
        if self.vision_ready.load(Ordering::Acquire) {
            self.backends.vision.as_deref()
        } else {
            None
        }
    }
}

/// Owner of all mutable scanner state: current session, loop task, busy
/// guard, capture handle. Lifecycle is `new -> start -> (ticks) -> stop`,
/// with `restart` fully superseding the old session before a new capture
/// begins.
pub struct ScannerEngine {
    shared: Arc<EngineShared>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl ScannerEngine {
    pub fn new(backends: ScannerBackends, graph: NavigationGraph, config: ScannerConfig) -> Self {
        let session = ScanSession::new(config.scan_timeout());
        Self {
            shared: Arc::new(EngineShared {
                config,
                graph,
                backends,
                session: Mutex::new(session),
                decode_busy: AtomicBool::new(false),
                vision_ready: AtomicBool::new(false),
            }),
            ticker: Mutex::new(None),
            cancel: Mutex::new(None),
        }
    }

    /// Acquire the camera, settle the vision capability, install a fresh
    /// session, and spawn the frame loop. Camera denial is fatal and is not
    /// retried automatically.
    pub async fn start(&self) -> Result<()> {
        {
            let ticker = self.ticker.lock().await;
            if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
                bail!("scanner already active");
            }
        }

        let presentation = &self.shared.backends.presentation;
        presentation.set_status("Initializing...");
        presentation.set_overlay("Initializing camera...");

        let capture = Arc::clone(&self.shared.backends.capture);
        let facing = self.shared.config.facing;
        let acquired = tokio::task::spawn_blocking(move || capture.acquire_stream(facing))
            .await
            .context("camera acquire worker join failed")?;
        if let Err(err) = acquired {
            match err {
                CaptureError::Denied => presentation.set_status("Camera access denied"),
                _ => presentation.set_status("Camera unavailable"),
            }
            return Err(anyhow::Error::new(err).context("failed to start scan session"));
        }

        let enhanced = self.await_vision_ready().await;
        self.shared.vision_ready.store(enhanced, Ordering::Release);
        presentation.set_status(if enhanced {
            "Ready - enhanced color detection"
        } else {
            "Ready - basic detection only"
        });

        // scan region is fixed once the camera dimensions are known
        let capture = Arc::clone(&self.shared.backends.capture);
        let probe = tokio::task::spawn_blocking(move || capture.current_frame())
            .await
            .context("frame capture worker join failed")?;
        let probe = match probe {
            Ok(frame) => frame,
            Err(err) => {
                self.shared.backends.capture.release_stream();
                return Err(anyhow::Error::new(err).context("probe frame failed"));
            }
        };
        let region = ScanRegion::centered(
            probe.width(),
            probe.height(),
            self.shared.config.scan_size,
        );

        {
            let mut session = self.shared.session.lock().await;
            *session = ScanSession::new(self.shared.config.scan_timeout());
            info!(
                "scan session {} started ({}x{} frame, region {:?})",
                session.id(),
                probe.width(),
                probe.height(),
                region
            );
        }
        self.shared.decode_busy.store(false, Ordering::Release);
        presentation.set_overlay("Scanning for QR codes...");

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(scan_loop(
            Arc::clone(&self.shared),
            region,
            cancel_token.clone(),
        ));

        *self.ticker.lock().await = Some(handle);
        *self.cancel.lock().await = Some(cancel_token);
        Ok(())
    }

    /// Bounded wait for the optional vision backend; expiry or absence means
    /// linear-channel-only mode for the whole session.
    async fn await_vision_ready(&self) -> bool {
        let Some(vision) = self.shared.backends.vision.as_ref() else {
            info!("no vision backend supplied; using linear-channel extraction only");
            return false;
        };

        let vision = Arc::clone(vision);
        let poll = async move {
            while !vision.is_ready() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        };

        match tokio::time::timeout(self.shared.config.vision_wait(), poll).await {
            Ok(()) => true,
            Err(_) => {
                warn!(
                    "vision backend not ready within {:?}; using linear-channel extraction only",
                    self.shared.config.vision_wait()
                );
                false
            }
        }
    }

    /// Synchronously halt tick scheduling and release the capture resource.
    pub async fn stop(&self) -> Result<()> {
        if let Some(token) = self.cancel.lock().await.take() {
            token.cancel();
        }
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.await.context("scan loop task failed to join")?;
        }
        self.shared.backends.capture.release_stream();
        Ok(())
    }

    /// The single external restart entry point. The old driver and session
    /// are fully torn down before the new capture starts; two sessions are
    /// never live at once.
    pub async fn restart(&self) -> Result<()> {
        self.stop().await?;
        self.start().await?;
        self.shared
            .backends
            .presentation
            .set_status("Scanning restarted");
        Ok(())
    }

    pub async fn session_snapshot(&self) -> ScanSession {
        self.shared.session.lock().await.clone()
    }

    pub async fn status(&self) -> ScanStatus {
        self.shared.session.lock().await.status()
    }

    /// Whether the range-mask strategy is active for the current session.
    pub fn enhanced_detection(&self) -> bool {
        self.shared.vision_ready.load(Ordering::Acquire)
    }
}
