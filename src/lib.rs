//! chatline - Terminal Chat Client
//!
//! Streams completions from an OpenAI-compatible endpoint into the
//! terminal, one fragment at a time.
//!
//! # Architecture
//!
//! - **streaming**: request building, incremental UTF-8 decoding, and the
//!   cancellable stream consumer
//! - **session**: in-memory conversation state and the Idle/Streaming
//!   session machine
//! - **repl**: interactive loop, commands, and display
//! - **config**: persisted settings with an explicit load/merge/save
//!   lifecycle

pub mod errors;
pub mod types;
pub mod streaming;
pub mod session;
pub mod config;
pub mod telemetry;
pub mod speech;
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use errors::{ChatError, Result};
pub use session::{Conversation, SessionState, UNKNOWN_ERROR_REPLY};
pub use streaming::{ChatClient, RequestOptions, StreamSession, Utf8Decoder};
pub use types::{ChatTurn, Role};
