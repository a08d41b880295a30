//! Incremental UTF-8 decoder for raw byte streams
//!
//! Network chunks arrive at arbitrary boundaries and may split a multi-byte
//! character. The decoder accumulates bytes and emits text only when the
//! whole buffer decodes strictly, so no emitted fragment ever contains a
//! replacement character; buffer state carries over between chunks.
//! - Buffer: 1MB maximum
//! - Emission: all-or-nothing per chunk, strict decode
//! - End of stream: lenient flush of whatever remains

use crate::errors::{ChatError, Result};

/// Maximum buffer size (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// Incremental UTF-8 decoder
#[derive(Debug)]
pub struct Utf8Decoder {
    /// Accumulation buffer; holds bytes since the last emitted fragment
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_buffer_size: usize,
}

impl Utf8Decoder {
    /// Create new decoder with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create decoder with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
        }
    }

    /// Add a chunk of bytes and attempt to emit a decoded fragment
    ///
    /// Appends the chunk to the buffer and strictly decodes the whole
    /// buffer. On success the decoded text is returned and the buffer
    /// cleared. If the buffer ends mid-sequence nothing is emitted and the
    /// buffer is retained unchanged for the next chunk.
    pub fn push(&mut self, bytes: &[u8]) -> Result<Option<String>> {
        if self.buffer.len() + bytes.len() > self.max_buffer_size {
            return Err(ChatError::StreamingError(format!(
                "decode buffer overflow: {} bytes exceeds maximum {}",
                self.buffer.len() + bytes.len(),
                self.max_buffer_size
            )));
        }

        self.buffer.extend_from_slice(bytes);

        match std::str::from_utf8(&self.buffer) {
            Ok(text) => {
                let fragment = text.to_string();
                self.buffer.clear();
                Ok(Some(fragment))
            }
            // Incomplete (or malformed) tail; wait for more bytes
            Err(_) => Ok(None),
        }
    }

    /// Flush the buffer at end of stream
    ///
    /// Whatever the strict decode could not emit is decoded leniently, with
    /// replacement characters substituted for any truly malformed tail.
    /// Returns `None` when the buffer is empty.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }

        let fragment = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        Some(fragment)
    }

    /// Get current buffer size
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for Utf8Decoder {
    fn default() -> Self {
        Self::new()
    }
}
