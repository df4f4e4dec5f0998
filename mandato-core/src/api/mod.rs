//! Remote command API abstraction.
//!
//! The `CommandApi` trait decouples the pipeline from the HTTP transport so
//! tests can substitute scripted backends. The production implementation is
//! [`http::HttpCommandApi`].
//!
//! Transport failures map HTTP statuses onto a fixed user-message table and
//! are never retried.

pub mod http;

pub use http::HttpCommandApi;

use async_trait::async_trait;
use thiserror::Error;

use crate::report::DownloadFormat;
use crate::types::{CommandResponse, HistoryEntry, HistoryQuery};

/// Generic fallback when the backend reports a failure without a usable
/// message. Also covers unrecognized transport errors.
pub const GENERIC_COMMAND_ERROR: &str = "Error al procesar el comando. Intenta de nuevo.";

/// Errors produced by the remote command API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend returned HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode backend response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if let Some(status) = e.status() {
            ApiError::Status(status.as_u16())
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl ApiError {
    /// Fixed status→message table rendered by the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Status(400) => "Comando inválido. Verifica el texto e intenta de nuevo.",
            ApiError::Status(401) => "Tu sesión ha expirado. Inicia sesión nuevamente.",
            ApiError::Status(403) => "No tienes permisos para ejecutar comandos.",
            ApiError::Status(404) => "Recurso no encontrado.",
            ApiError::Status(408) | ApiError::Status(504) | ApiError::Timeout => {
                "La solicitud tardó demasiado. Intenta de nuevo."
            }
            ApiError::Status(code) if (500..=599).contains(code) => {
                "Error del servidor. Intenta más tarde."
            }
            _ => GENERIC_COMMAND_ERROR,
        }
    }
}

/// Extract a human-readable error message from a duck-typed backend payload.
///
/// Precedence, fixed once for every call site:
/// `data.error_message` → `error` → `detail` → `message`.
/// Blank strings are skipped.
pub fn error_message_of(payload: &serde_json::Value) -> Option<String> {
    let candidates = [
        payload.pointer("/data/error_message"),
        payload.get("error"),
        payload.get("detail"),
        payload.get("message"),
    ];
    candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Contract for command backends.
#[async_trait]
pub trait CommandApi: Send + Sync {
    /// Submit raw trimmed command text for interpretation.
    async fn process(&self, text: &str) -> Result<CommandResponse, ApiError>;

    /// Fetch a page of the remote command history.
    async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, ApiError>;

    /// Fetch the binary report payload for a command.
    ///
    /// Only the binary formats reach here; JSON export is serialized
    /// locally by the pipeline and never issues a network call.
    async fn download(&self, id: u64, format: DownloadFormat) -> Result<Vec<u8>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_table_is_exact() {
        assert_eq!(
            ApiError::Status(400).user_message(),
            "Comando inválido. Verifica el texto e intenta de nuevo."
        );
        assert_eq!(
            ApiError::Status(401).user_message(),
            "Tu sesión ha expirado. Inicia sesión nuevamente."
        );
        assert_eq!(
            ApiError::Status(403).user_message(),
            "No tienes permisos para ejecutar comandos."
        );
        assert_eq!(ApiError::Status(404).user_message(), "Recurso no encontrado.");
        for code in [408_u16, 504] {
            assert_eq!(
                ApiError::Status(code).user_message(),
                "La solicitud tardó demasiado. Intenta de nuevo."
            );
        }
        assert_eq!(
            ApiError::Timeout.user_message(),
            "La solicitud tardó demasiado. Intenta de nuevo."
        );
        for code in [500_u16, 502, 503, 599] {
            assert_eq!(
                ApiError::Status(code).user_message(),
                "Error del servidor. Intenta más tarde."
            );
        }
        assert_eq!(ApiError::Status(418).user_message(), GENERIC_COMMAND_ERROR);
        assert_eq!(
            ApiError::Transport("refused".into()).user_message(),
            GENERIC_COMMAND_ERROR
        );
    }

    #[test]
    fn message_extraction_follows_precedence() {
        let payload = json!({
            "data": {"error_message": "del data"},
            "error": "del error",
            "detail": "del detail",
            "message": "del message"
        });
        assert_eq!(error_message_of(&payload).as_deref(), Some("del data"));

        let payload = json!({"error": "del error", "detail": "del detail"});
        assert_eq!(error_message_of(&payload).as_deref(), Some("del error"));

        let payload = json!({"detail": "del detail"});
        assert_eq!(error_message_of(&payload).as_deref(), Some("del detail"));

        let payload = json!({"message": "del message"});
        assert_eq!(error_message_of(&payload).as_deref(), Some("del message"));
    }

    #[test]
    fn message_extraction_skips_blank_candidates() {
        let payload = json!({
            "data": {"error_message": "   "},
            "error": "",
            "detail": "usable"
        });
        assert_eq!(error_message_of(&payload).as_deref(), Some("usable"));

        let payload = json!({"status": "ok"});
        assert!(error_message_of(&payload).is_none());
    }
}
