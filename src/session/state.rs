use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{ColorChannel, DecodedResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanStatus {
    Active,
    Complete,
    TimedOut,
}

/// Bounded-lifetime state machine tracking progress toward decoding all
/// three colors. Created when scanning starts, mutated only by the tick that
/// owns the current dispatch pass, discarded wholesale on restart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSession {
    id: String,
    status: ScanStatus,
    /// Discovery order; at most one entry per color.
    results: Vec<DecodedResult>,
    /// Codes of navigation-matched results, append-only.
    visited_route: Vec<String>,
    current_location: Option<String>,
    started_at: DateTime<Utc>,
    #[serde(skip)]
    start_anchor: Instant,
    #[serde(skip)]
    timeout: Duration,
}

impl ScanSession {
    pub fn new(timeout: Duration) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            status: ScanStatus::Active,
            results: Vec::new(),
            visited_route: Vec::new(),
            current_location: None,
            started_at: Utc::now(),
            start_anchor: Instant::now(),
            timeout,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status != ScanStatus::Active
    }

    pub fn results(&self) -> &[DecodedResult] {
        &self.results
    }

    pub fn visited_route(&self) -> &[String] {
        &self.visited_route
    }

    pub fn current_location(&self) -> Option<&str> {
        self.current_location.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.start_anchor.elapsed()
    }

    pub fn has_color(&self, color: ColorChannel) -> bool {
        self.results.iter().any(|r| r.color == color)
    }

    pub fn found_colors(&self) -> Vec<ColorChannel> {
        ColorChannel::ALL
            .into_iter()
            .filter(|c| self.has_color(*c))
            .collect()
    }

    /// Colors still missing, in canonical order.
    pub fn missing_colors(&self) -> Vec<ColorChannel> {
        ColorChannel::ALL
            .into_iter()
            .filter(|c| !self.has_color(*c))
            .collect()
    }

    /// Commit one newly discovered result. Refused (returns `false`) for a
    /// terminal session or a color already present: once a color is found,
    /// later conflicting decodes for it are suppressed for the session's
    /// lifetime. Only navigation-matched results advance the route and the
    /// current location.
    pub fn record_result(&mut self, result: DecodedResult) -> bool {
        if self.is_terminal() || self.has_color(result.color) {
            return false;
        }

        if result.is_matched() {
            self.visited_route.push(result.code.clone());
            self.current_location = Some(result.code.clone());
        }
        self.results.push(result);
        true
    }

    /// Evaluated once per tick, after committing any newly discovered
    /// results. Terminal states are entered from `Active` only and are
    /// mutually exclusive: completeness wins over the deadline.
    pub fn evaluate_transition(&mut self) -> ScanStatus {
        if self.status == ScanStatus::Active {
            if self.results.len() == ColorChannel::ALL.len() {
                self.status = ScanStatus::Complete;
            } else if self.elapsed() >= self.timeout {
                self.status = ScanStatus::TimedOut;
            }
        }
        self.status
    }

    #[cfg(test)]
    pub(crate) fn backdate(&mut self, by: Duration) {
        self.start_anchor -= by;
    }
}
