use thiserror::Error;

use crate::api::ApiError;
use crate::recognizer::UNSUPPORTED_MESSAGE;

/// All errors produced by mandato-core.
#[derive(Debug, Error)]
pub enum MandatoError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("speech recognition is not supported on this platform")]
    RecognizerUnsupported,

    #[error("no dictation session is active")]
    NotListening,

    #[error("no result payload is held in memory")]
    NoResultHeld,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MandatoError {
    /// Localized, presentation-ready message for the single error surface
    /// the UI renders. Backend and transport details stay in `Display`/logs.
    pub fn user_message(&self) -> String {
        match self {
            MandatoError::Api(e) => e.user_message().to_string(),
            MandatoError::RecognizerUnsupported => UNSUPPORTED_MESSAGE.to_string(),
            MandatoError::NotListening => "No hay una sesión de dictado activa.".to_string(),
            MandatoError::NoResultHeld => "No hay un resultado para exportar.".to_string(),
            MandatoError::Io(_) => "No se pudo guardar el archivo.".to_string(),
            MandatoError::Other(_) => "Error inesperado. Intenta de nuevo.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MandatoError>;
