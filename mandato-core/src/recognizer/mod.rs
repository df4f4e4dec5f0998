//! Speech recognizer abstraction.
//!
//! The `SpeechRecognizer` trait is the primary extensibility point: the
//! production binding is a browser-vendor speech interface that lives
//! outside this crate, so the SDK ships `NullRecognizer` (uniformly
//! unsupported) and `StubRecognizer` (scripted events for tests and the
//! console demo). Engine callbacks arrive on the host event loop as
//! [`RecognizerEvent`] values fed to `SpeechCapture::on_event`.

pub mod null;
pub mod stub;

pub use null::NullRecognizer;
pub use stub::StubRecognizer;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Message shown when the recognition capability is absent on this platform.
pub const UNSUPPORTED_MESSAGE: &str =
    "El reconocimiento de voz no está soportado en este dispositivo.";

/// Recognition session parameters mirroring the browser interface defaults
/// used by the storefront: Spanish locale, one-shot sessions, interim
/// hypotheses enabled, a single alternative per result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizerConfig {
    pub locale: String,
    pub continuous: bool,
    pub interim_results: bool,
    pub max_alternatives: u8,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            locale: "es-ES".into(),
            continuous: false,
            interim_results: true,
            max_alternatives: 1,
        }
    }
}

/// Normalized recognition error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognizerErrorKind {
    NoSpeech,
    AudioCaptureDenied,
    PermissionDenied,
    Network,
    Aborted,
    ServiceNotAllowed,
    Unknown,
}

impl RecognizerErrorKind {
    /// Map a vendor engine error code onto the normalized taxonomy.
    pub fn from_engine_code(code: &str) -> Self {
        match code {
            "no-speech" => RecognizerErrorKind::NoSpeech,
            "audio-capture" => RecognizerErrorKind::AudioCaptureDenied,
            "not-allowed" => RecognizerErrorKind::PermissionDenied,
            "network" => RecognizerErrorKind::Network,
            "aborted" => RecognizerErrorKind::Aborted,
            "service-not-allowed" => RecognizerErrorKind::ServiceNotAllowed,
            _ => RecognizerErrorKind::Unknown,
        }
    }

    /// Fixed per-kind message table rendered by the UI.
    pub fn user_message(self) -> &'static str {
        match self {
            RecognizerErrorKind::NoSpeech => "No se detectó voz. Intenta de nuevo.",
            RecognizerErrorKind::AudioCaptureDenied => {
                "No se pudo acceder al micrófono. Verifica tu dispositivo."
            }
            RecognizerErrorKind::PermissionDenied => {
                "Permiso de micrófono denegado. Habilítalo en la configuración."
            }
            RecognizerErrorKind::Network => "Error de red en el reconocimiento de voz.",
            RecognizerErrorKind::Aborted => "Reconocimiento de voz cancelado.",
            RecognizerErrorKind::ServiceNotAllowed => {
                "El servicio de reconocimiento de voz no está permitido."
            }
            RecognizerErrorKind::Unknown => "Error en el reconocimiento de voz. Intenta de nuevo.",
        }
    }
}

/// One engine callback, delivered cooperatively on the host event loop.
#[derive(Debug, Clone)]
pub enum RecognizerEvent {
    /// Interim or final hypothesis for the current utterance. Later
    /// hypotheses replace earlier ones; they are never appended.
    Hypothesis { text: String, is_final: bool },
    /// Engine-signaled end of the session (natural end or stop ack).
    Ended,
    /// Engine-signaled failure for the current session.
    Error(RecognizerErrorKind),
}

/// Contract for recognition backends.
///
/// Implementors may be stateful (session handles, scripted queues). The
/// engine handle must be releasable via `abort` at any time, in any state.
pub trait SpeechRecognizer: Send + 'static {
    /// Whether the capability exists on this platform at all.
    fn is_supported(&self) -> bool;

    /// Begin one listening session.
    ///
    /// # Errors
    /// Returns an error if the capability is unsupported or the engine
    /// refuses to start.
    fn begin(&mut self) -> Result<()>;

    /// Request an orderly stop. The engine acknowledges asynchronously with
    /// a [`RecognizerEvent::Ended`] — callers must not assume an immediate
    /// state change.
    fn end(&mut self);

    /// Release the engine handle unconditionally (no end event expected).
    fn abort(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_codes_map_to_taxonomy() {
        assert_eq!(
            RecognizerErrorKind::from_engine_code("no-speech"),
            RecognizerErrorKind::NoSpeech
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("audio-capture"),
            RecognizerErrorKind::AudioCaptureDenied
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("not-allowed"),
            RecognizerErrorKind::PermissionDenied
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("network"),
            RecognizerErrorKind::Network
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("aborted"),
            RecognizerErrorKind::Aborted
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("service-not-allowed"),
            RecognizerErrorKind::ServiceNotAllowed
        );
        assert_eq!(
            RecognizerErrorKind::from_engine_code("bad-grammar"),
            RecognizerErrorKind::Unknown
        );
    }

    #[test]
    fn default_config_matches_storefront_session() {
        let config = RecognizerConfig::default();
        assert_eq!(config.locale, "es-ES");
        assert!(!config.continuous);
        assert!(config.interim_results);
        assert_eq!(config.max_alternatives, 1);
    }
}
