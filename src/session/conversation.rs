//! In-memory conversation state
//!
//! Ordered list of chat turns plus the Idle/Streaming state machine.
//! Appends come from user submissions and finalized assistant responses;
//! targeted in-place edits support the inline turn-editing affordance.
//! History lives only for the process lifetime.

use crate::errors::{ChatError, Result};
use crate::session::state::{SessionEvent, SessionState};
use crate::types::{ChatTurn, Role};

/// Literal content of the synthetic turn appended when a request never
/// yields a usable stream
pub const UNKNOWN_ERROR_REPLY: &str = "Unknown Error";

/// Conversation controller
///
/// Owns the turn list and the session state machine; all stream lifecycle
/// transitions route through it so the one-active-session invariant holds.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<ChatTurn>,
    state: SessionState,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Conversation {
            turns: Vec::new(),
            state: SessionState::Idle,
        }
    }

    /// Turns in conversation order
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the conversation is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a stream is in flight
    pub fn is_streaming(&self) -> bool {
        self.state.is_streaming()
    }

    /// Append a turn to the end
    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Append a user turn, optionally carrying an encoded image
    pub fn push_user(&mut self, content: impl Into<String>, image: Option<String>) {
        self.turns.push(ChatTurn::user(content, image));
    }

    /// Replace the content of the turn at `index`
    ///
    /// Role and image at that index, and all other turns, are unchanged.
    pub fn edit(&mut self, index: usize, new_content: impl Into<String>) -> Result<()> {
        let len = self.turns.len();
        let turn = self
            .turns
            .get_mut(index)
            .ok_or(ChatError::InvalidTurnIndex { index, len })?;
        turn.content = new_content.into();
        Ok(())
    }

    /// Empty the conversation
    ///
    /// Rejected (no-op, returns `false`) while a stream is in flight;
    /// empties unconditionally otherwise.
    pub fn clear(&mut self) -> bool {
        if self.state.is_streaming() {
            return false;
        }
        self.turns.clear();
        true
    }

    /// Mark the start of a new stream (Idle → Streaming)
    ///
    /// Rejects submission while another session is in flight.
    pub fn begin_stream(&mut self) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Submit)?;
        Ok(())
    }

    /// Fold a completed stream into the conversation as an assistant turn
    pub fn complete_stream(&mut self, text: impl Into<String>) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Complete)?;
        self.turns.push(ChatTurn::assistant(text));
        Ok(())
    }

    /// Settle a cancelled stream; no turn is appended
    pub fn cancel_stream(&mut self) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Cancel)?;
        Ok(())
    }

    /// Settle a failed stream, appending the synthetic error turn
    pub fn fail_stream(&mut self) -> Result<()> {
        self.state = self.state.transition(SessionEvent::Fail)?;
        self.turns.push(ChatTurn::assistant(UNKNOWN_ERROR_REPLY));
        Ok(())
    }

    /// Last assistant turn, if any
    pub fn last_assistant(&self) -> Option<&ChatTurn> {
        self.turns.iter().rev().find(|t| t.role == Role::Assistant)
    }
}
