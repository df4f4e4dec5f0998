//! # mandato-core
//!
//! Reusable command-client SDK for the Mandato commerce analytics console.
//!
//! ## Architecture
//!
//! ```text
//! SpeechRecognizer → SpeechCapture ─┐
//!                                   ├─► CommandPipeline::process
//! typed text ───────────────────────┘        │
//!                                       CommandCache (TTL + FIFO)
//!                                            │ miss
//!                                       CommandApi (REST backend)
//!                                            │
//!                              PipelineSnapshot → UI / ReportSink
//! ```
//!
//! All state is confined to the owning instance; remote calls are
//! non-blocking request/response operations.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod api;
pub mod cache;
pub mod capture;
pub mod error;
pub mod pipeline;
pub mod recognizer;
pub mod report;
pub mod session;
pub mod types;

// Convenience re-exports for downstream crates
pub use api::{ApiError, CommandApi, HttpCommandApi};
pub use cache::{CommandCache, COMMAND_CACHE_TTL, MAX_CACHE_SIZE};
pub use capture::{CaptureState, SpeechCapture};
pub use error::{MandatoError, Result};
pub use pipeline::{validate, CommandPipeline, PipelineSnapshot, ValidationError};
pub use recognizer::{
    NullRecognizer, RecognizerConfig, RecognizerErrorKind, RecognizerEvent, SpeechRecognizer,
    StubRecognizer,
};
pub use report::{default_filename, DownloadFormat, ReportSink};
pub use session::{MemorySessionStore, SessionStore};
pub use types::{
    CommandResponse, CommandStatus, HistoryEntry, HistoryQuery, ResultData, Suggestion,
};
