//! Speech capability seam
//!
//! Voice delivery depends on host-platform speech synthesis with no
//! portable equivalent, so the core only defines an injectable interface.
//! [`NullSpeech`] is the stub used wherever no engine is wired in.

use crate::errors::Result;
use async_trait::async_trait;

/// Injectable speech synthesis capability
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Whether this engine can actually produce audio
    fn is_available(&self) -> bool;

    /// Speak a completed response
    async fn speak(&self, text: &str) -> Result<()>;
}

/// No-op engine for platforms without speech synthesis
pub struct NullSpeech;

#[async_trait]
impl SpeechEngine for NullSpeech {
    fn is_available(&self) -> bool {
        false
    }

    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Engine for the current platform
pub fn default_engine() -> Box<dyn SpeechEngine> {
    Box::new(NullSpeech)
}
