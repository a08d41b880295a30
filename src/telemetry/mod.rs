//! Telemetry for streaming sessions
//!
//! Collects per-run counters and the throughput readout shown after each
//! response. The terminal display is the only sink; nothing is persisted.

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Measurements from one completed stream
#[derive(Debug, Clone)]
pub struct StreamStats {
    /// Non-empty fragments received
    pub tokens: usize,

    /// Wall-clock time from submission to final fragment
    pub elapsed: Duration,

    /// When the session started
    pub started_at: DateTime<Utc>,
}

impl StreamStats {
    /// Throughput as tokens per second; zero-duration streams report 0.0
    pub fn tokens_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.tokens as f64 / secs
        } else {
            0.0
        }
    }
}

/// Per-run session counters
#[derive(Debug, Default)]
pub struct TelemetryCollector {
    completed: usize,
    cancelled: usize,
    failed: usize,
    total_tokens: usize,
    last: Option<StreamStats>,
}

impl TelemetryCollector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a normally completed session
    pub fn record_completed(&mut self, stats: StreamStats) {
        self.completed += 1;
        self.total_tokens += stats.tokens;
        self.last = Some(stats);
    }

    /// Record a user-cancelled session
    pub fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    /// Record a session that never produced a usable stream
    pub fn record_failed(&mut self) {
        self.failed += 1;
    }

    /// Stats of the most recent completed session
    pub fn last(&self) -> Option<&StreamStats> {
        self.last.as_ref()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }
}
