//! Wire types shared with the command backend.
//!
//! Field names follow the backend's snake_case JSON exactly
//! (`error_message`, `processing_time_ms`, ...). The report body itself is
//! opaque to the client — tabular/summary data passes through as raw JSON
//! and is only rendered, never interpreted.

use serde::{Deserialize, Serialize};

/// Lifecycle status assigned by the backend once a command is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandStatus {
    Executed,
    Failed,
    Processing,
}

/// Structured payload returned for a successfully interpreted command.
///
/// Everything beyond the known metadata fields is collected into `extra`
/// so new backend fields never break deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultData {
    /// Backend-assigned command id; present once the command was accepted.
    #[serde(default)]
    pub command_id: Option<u64>,
    /// Report kind, e.g. `"ventas_mensual"` or `"Top Productos"`.
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Interpretation certainty in [0, 1].
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    /// Populated on the soft-failure (low confidence) path.
    #[serde(default)]
    pub error_message: Option<String>,
    /// Opaque report body: summary figures, rows, chart series.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Alternative interpretation offered when confidence is below the
/// "clear" threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Display name, e.g. `"Top Productos"`.
    pub name: String,
    /// Ready-to-resubmit command text.
    pub command: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Envelope of `POST /api/voice-commands/process/`.
///
/// `success == false` with a 2xx status is the ambiguous-command path,
/// not a transport failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<ResultData>,
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

/// Read-only projection of a past command, owned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub text: String,
    pub status: CommandStatus,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    /// RFC 3339 timestamp as emitted by the backend.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Pagination parameters for the history endpoint.
#[derive(Debug, Clone, Copy)]
pub struct HistoryQuery {
    pub page: usize,
    pub page_size: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}
