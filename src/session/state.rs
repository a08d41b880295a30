//! Conversation session state machine
//!
//! At most one completion stream may be in flight at a time. The rule is
//! enforced here as an explicit two-state machine rather than by UI
//! disabled-state flags: conflicting operations are rejected with an
//! [`ChatError::InvalidTransition`] instead of being silently dropped.

use crate::errors::{ChatError, Result};
use serde::{Deserialize, Serialize};

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// No stream in flight; submissions are accepted
    Idle,

    /// A completion stream is being consumed
    Streaming,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A user turn was submitted and a stream is being established
    Submit,

    /// The stream ended normally and was folded into the conversation
    Complete,

    /// The user cancelled the stream; partial output discarded
    Cancel,

    /// The stream never became usable (or died mid-flight)
    Fail,
}

impl SessionState {
    /// Whether a stream is currently in flight
    pub fn is_streaming(&self) -> bool {
        matches!(self, SessionState::Streaming)
    }

    /// Attempt a state transition
    ///
    /// Valid transitions:
    /// - Idle      → Streaming  (on: Submit)
    /// - Streaming → Idle       (on: Complete | Cancel | Fail)
    ///
    /// Everything else is rejected.
    pub fn transition(&self, event: SessionEvent) -> Result<SessionState> {
        use SessionEvent::*;
        use SessionState::*;

        match (self, event) {
            (Idle, Submit) => Ok(Streaming),
            (Streaming, Complete) | (Streaming, Cancel) | (Streaming, Fail) => Ok(Idle),
            (state, event) => {
                let target = match event {
                    Submit => Streaming,
                    Complete | Cancel | Fail => Idle,
                };
                Err(ChatError::InvalidTransition {
                    from: format!("{:?}", state),
                    to: format!("{:?}", target),
                    reason: match state {
                        Streaming => "a session is already in flight".to_string(),
                        Idle => "no session is in flight".to_string(),
                    },
                })
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle
    }
}
