//! Core type definitions
//!
//! Conversation turn types shared by the streaming client, session state,
//! and terminal UI.

pub mod messages;

pub use messages::{ChatTurn, Role};
