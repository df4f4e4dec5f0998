//! `SpeechCapture` — cooperative wrapper over a recognition backend.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──start()──► Listening ──engine Ended──► Idle (transcript retained)
//!                      │
//!                      ├─ Hypothesis → transcript overwritten in place
//!                      └─ Error ─────► ErrorReported ──start()──► Listening
//! ```
//!
//! `start()` in the wrong state is a no-op rather than an error; `stop()`
//! only requests an engine stop — the actual transition happens when the
//! engine acknowledges with its own end event.
//!
//! One special case: a `Network` engine error arriving after a non-empty
//! transcript was already captured is suppressed and treated as a normal
//! end, because the partial hypothesis is still usable.

use tracing::{debug, warn};

use crate::error::{MandatoError, Result};
use crate::recognizer::{
    RecognizerErrorKind, RecognizerEvent, SpeechRecognizer, UNSUPPORTED_MESSAGE,
};

/// Capture state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// No session active; a new one may be started.
    Idle,
    /// A recognition session is active.
    Listening,
    /// The last session ended with a reported error; a new session may be
    /// started, which clears the error.
    ErrorReported,
}

/// Single-threaded speech capture session owner.
///
/// Owns the recognizer handle exclusively; engine callbacks are delivered
/// by the host event loop through [`SpeechCapture::on_event`]. No two
/// sessions are ever active concurrently.
pub struct SpeechCapture {
    recognizer: Box<dyn SpeechRecognizer>,
    state: CaptureState,
    transcript: String,
    error: Option<String>,
}

impl SpeechCapture {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state: CaptureState::Idle,
            transcript: String::new(),
            error: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_listening(&self) -> bool {
        self.state == CaptureState::Listening
    }

    /// Last recognized hypothesis, interim or final.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Mapped error message from the last session, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Begin a listening session.
    ///
    /// No-op while already `Listening`. When the capability is unsupported
    /// the failure is silent: the mapped message lands in `error()` and no
    /// session starts.
    pub fn start(&mut self) -> Result<()> {
        if self.state == CaptureState::Listening {
            debug!("start ignored — already listening");
            return Ok(());
        }

        self.transcript.clear();
        self.error = None;

        if !self.recognizer.is_supported() {
            debug!("recognition unsupported on this platform");
            self.error = Some(UNSUPPORTED_MESSAGE.to_string());
            self.state = CaptureState::ErrorReported;
            return Ok(());
        }

        match self.recognizer.begin() {
            Ok(()) => {
                self.state = CaptureState::Listening;
                debug!("listening session started");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "recognizer failed to start");
                self.error = Some(e.user_message());
                self.state = CaptureState::ErrorReported;
                Ok(())
            }
        }
    }

    /// Request an orderly stop of the active session.
    ///
    /// The engine's own end event performs the actual transition to `Idle`.
    ///
    /// # Errors
    /// - `MandatoError::NotListening` if no session is active.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != CaptureState::Listening {
            return Err(MandatoError::NotListening);
        }
        self.recognizer.end();
        debug!("stop requested — awaiting engine end event");
        Ok(())
    }

    /// Clear transcript and error without affecting the listening state.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.error = None;
    }

    /// Deliver one engine callback.
    ///
    /// Events arriving outside `Listening` are dropped — a late callback
    /// from an already-ended session must not disturb the next one.
    pub fn on_event(&mut self, event: RecognizerEvent) {
        if self.state != CaptureState::Listening {
            debug!(?event, "event dropped — no active session");
            return;
        }

        match event {
            RecognizerEvent::Hypothesis { text, is_final } => {
                // Most recent hypothesis wins; never appended.
                debug!(is_final, chars = text.chars().count(), "hypothesis");
                self.transcript = text;
            }
            RecognizerEvent::Ended => {
                debug!("engine end — session complete");
                self.state = CaptureState::Idle;
            }
            RecognizerEvent::Error(kind) => {
                if kind == RecognizerErrorKind::Network && !self.transcript.is_empty() {
                    // Partial results are usable; treat as a normal end.
                    debug!("network error suppressed — transcript already captured");
                    self.state = CaptureState::Idle;
                    return;
                }
                warn!(?kind, "recognition error");
                self.error = Some(kind.user_message().to_string());
                self.state = CaptureState::ErrorReported;
            }
        }
    }
}

impl Drop for SpeechCapture {
    fn drop(&mut self) {
        // The microphone is a scoped resource: release the engine handle
        // unconditionally, whatever state we are in.
        self.recognizer.abort();
    }
}
