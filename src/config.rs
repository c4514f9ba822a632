use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::backends::FacingPreference;

/// Tunable scanner thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerConfig {
    /// Side length of the centered scan square, pixels.
    pub scan_size: u32,
    /// Session deadline: a session that has not found all three colors by
    /// this point times out.
    pub scan_timeout_ms: u64,
    /// Tick cadence of the frame loop.
    pub tick_interval_ms: u64,
    /// How long the busy guard stays held after a dispatch completes,
    /// bounding decode frequency independently of the tick cadence.
    pub throttle_window_ms: u64,
    /// Bounded wait for the optional vision backend at startup; on expiry
    /// the scanner runs in linear-channel-only mode.
    pub vision_wait_ms: u64,
    pub facing: FacingPreference,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            scan_size: 250,
            scan_timeout_ms: 30_000,
            tick_interval_ms: 33,
            throttle_window_ms: 100,
            vision_wait_ms: 10_000,
            facing: FacingPreference::Environment,
        }
    }
}

impl ScannerConfig {
    /// Read a config file, falling back to defaults when the file does not
    /// exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_window_ms)
    }

    pub fn vision_wait(&self) -> Duration {
        Duration::from_millis(self.vision_wait_ms)
    }
}
