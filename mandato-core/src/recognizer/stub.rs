//! `StubRecognizer` — scripted backend that replays a fixed event sequence.
//!
//! Used by tests and the console demo so the full capture state machine can
//! be exercised end-to-end without a real microphone or vendor engine.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::Result;
use crate::recognizer::{RecognizerConfig, RecognizerEvent, SpeechRecognizer};

/// Replays a pre-loaded event script, one session per `begin()`.
///
/// The host drains the scripted events after `begin()` and feeds them to
/// `SpeechCapture::on_event`, the same way a vendor engine would deliver
/// callbacks on the event loop.
#[derive(Debug, Default)]
pub struct StubRecognizer {
    config: RecognizerConfig,
    script: VecDeque<RecognizerEvent>,
    sessions_started: u32,
    aborted: bool,
}

impl StubRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a recognizer with explicit session parameters.
    pub fn with_config(config: RecognizerConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Build a recognizer that will replay `events` on the next session.
    pub fn with_script(events: Vec<RecognizerEvent>) -> Self {
        Self {
            script: events.into(),
            ..Self::default()
        }
    }

    /// Queue an additional scripted event.
    pub fn push(&mut self, event: RecognizerEvent) {
        self.script.push_back(event);
    }

    /// Take all pending scripted events for delivery to the capture layer.
    pub fn drain(&mut self) -> Vec<RecognizerEvent> {
        self.script.drain(..).collect()
    }

    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    pub fn was_aborted(&self) -> bool {
        self.aborted
    }
}

impl SpeechRecognizer for StubRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn begin(&mut self) -> Result<()> {
        self.sessions_started += 1;
        debug!(
            session = self.sessions_started,
            locale = %self.config.locale,
            "StubRecognizer::begin"
        );
        Ok(())
    }

    fn end(&mut self) {
        // An orderly stop is acked by the scripted `Ended` event, matching
        // the asynchronous acknowledgement of a real engine.
        debug!("StubRecognizer::end");
        self.script.push_back(RecognizerEvent::Ended);
    }

    fn abort(&mut self) {
        debug!("StubRecognizer::abort");
        self.aborted = true;
        self.script.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognizer::RecognizerErrorKind;

    #[test]
    fn scripted_events_drain_in_order() {
        let mut recognizer = StubRecognizer::with_script(vec![
            RecognizerEvent::Hypothesis {
                text: "reporte".into(),
                is_final: false,
            },
            RecognizerEvent::Ended,
        ]);
        recognizer.begin().expect("stub begin");

        let events = recognizer.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            RecognizerEvent::Hypothesis { is_final: false, .. }
        ));
        assert!(matches!(events[1], RecognizerEvent::Ended));
        assert!(recognizer.drain().is_empty());
    }

    #[test]
    fn end_queues_the_engine_ack() {
        let mut recognizer = StubRecognizer::new();
        recognizer.begin().expect("stub begin");
        recognizer.end();
        let events = recognizer.drain();
        assert!(matches!(events.as_slice(), [RecognizerEvent::Ended]));
    }

    #[test]
    fn abort_discards_pending_events() {
        let mut recognizer =
            StubRecognizer::with_script(vec![RecognizerEvent::Error(RecognizerErrorKind::Network)]);
        recognizer.abort();
        assert!(recognizer.was_aborted());
        assert!(recognizer.drain().is_empty());
    }
}
