//! Streaming module
//!
//! Provides the OpenAI-compatible streaming client, the incremental UTF-8
//! decoder, and the session-level stream consumer.

pub mod client;
pub mod consumer;
pub mod decoder;

// Re-export commonly used types
pub use client::{
    ChatClient, ChatRequest, RequestOptions, StreamHandle, DEFAULT_BASE_URL, DEFAULT_MODEL,
    NO_TOKEN_LIMIT,
};
pub use consumer::{CompletedStream, StreamSession};
pub use decoder::{Utf8Decoder, MAX_BUFFER_SIZE};
