//! Stream consumption and accumulation
//!
//! Drives a [`StreamHandle`] end-to-end: single-pass fragment iteration,
//! running-response accumulation, cooperative cancellation, and the
//! token/elapsed bookkeeping behind the throughput readout.

use crate::errors::Result;
use crate::streaming::client::StreamHandle;
use crate::telemetry::StreamStats;
use chrono::{DateTime, Utc};
use std::time::Instant;
use uuid::Uuid;

/// One in-flight completion session
///
/// Created on submission, consumed exactly once, and destroyed when the
/// stream ends. Each [`StreamSession::next_fragment`] call is a suspension
/// point; between calls the caller may observe the partial response.
pub struct StreamSession {
    id: Uuid,
    handle: StreamHandle,
    response: String,
    tokens: usize,
    started: Instant,
    started_at: DateTime<Utc>,
    cancelled: bool,
}

/// Terminal result of a completed session
#[derive(Debug, Clone)]
pub struct CompletedStream {
    pub text: String,
    pub stats: StreamStats,
}

impl StreamSession {
    /// Wrap a freshly built handle
    pub fn new(handle: StreamHandle) -> Self {
        StreamSession {
            id: Uuid::new_v4(),
            handle,
            response: String::new(),
            tokens: 0,
            started: Instant::now(),
            started_at: Utc::now(),
            cancelled: false,
        }
    }

    /// Session id
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Pull the next non-empty fragment
    ///
    /// The fragment is appended to the running response and counted before
    /// it is returned. Empty deltas (role-only chunks) are skipped without
    /// counting. Returns `Ok(None)` once the stream has ended or the
    /// session was cancelled.
    pub async fn next_fragment(&mut self) -> Result<Option<String>> {
        if self.cancelled {
            return Ok(None);
        }

        loop {
            match self.handle.next().await {
                None => return Ok(None),
                Some(Err(e)) => return Err(e),
                Some(Ok(fragment)) if fragment.is_empty() => continue,
                Some(Ok(fragment)) => {
                    self.tokens += 1;
                    self.response.push_str(&fragment);
                    return Ok(Some(fragment));
                }
            }
        }
    }

    /// Response accumulated so far
    pub fn response(&self) -> &str {
        &self.response
    }

    /// Fragments counted so far
    pub fn token_count(&self) -> usize {
        self.tokens
    }

    /// Wall-clock time since the session started
    pub fn elapsed(&self) -> std::time::Duration {
        self.started.elapsed()
    }

    /// Whether the session was cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Cancel the session
    ///
    /// Aborts the underlying transport and discards the partial response;
    /// subsequent [`StreamSession::next_fragment`] calls return `Ok(None)`.
    /// A cancelled session is never finalized as a conversation turn.
    pub fn cancel(&mut self) {
        self.handle.cancel();
        self.response.clear();
        self.cancelled = true;
    }

    /// Finalize a normally completed session
    pub fn finish(self) -> CompletedStream {
        CompletedStream {
            text: self.response,
            stats: StreamStats {
                tokens: self.tokens,
                elapsed: self.started.elapsed(),
                started_at: self.started_at,
            },
        }
    }
}
