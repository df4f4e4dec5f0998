//! `NullRecognizer` — backend for platforms without a recognition capability.
//!
//! Reports `unsupported` uniformly so the capture layer degrades to the
//! fixed error message instead of failing at the call site.

use tracing::debug;

use crate::error::{MandatoError, Result};
use crate::recognizer::SpeechRecognizer;

/// Always-unsupported recognition backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecognizer;

impl NullRecognizer {
    pub fn new() -> Self {
        Self
    }
}

impl SpeechRecognizer for NullRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn begin(&mut self) -> Result<()> {
        Err(MandatoError::RecognizerUnsupported)
    }

    fn end(&mut self) {
        debug!("NullRecognizer::end — no-op");
    }

    fn abort(&mut self) {
        debug!("NullRecognizer::abort — no-op");
    }
}
