//! `CommandPipeline` — validated, cached, remotely-dispatched commands.
//!
//! ## Flow
//!
//! ```text
//! text ──validate──► cache lookup ──hit──► result
//!                         │
//!                        miss
//!                         │
//!                  CommandApi::process ──success──► result + cache insert
//!                         │
//!                         ├─ success=false ──► error + suggestions
//!                         └─ transport err ──► mapped error
//! ```
//!
//! Every `process` call first clears result/error/suggestions so stale UI
//! state never survives a new submission. Overlapping calls are allowed:
//! each takes a ticket from a monotonically increasing counter and a
//! response is applied only while its ticket is still the latest issued —
//! late responses from superseded calls are discarded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{CommandApi, GENERIC_COMMAND_ERROR};
use crate::cache::CommandCache;
use crate::error::{MandatoError, Result};
use crate::report::{default_filename, DownloadFormat, ReportSink};
use crate::types::{HistoryEntry, HistoryQuery, ResultData, Suggestion};

/// Minimum command length in characters, after trimming.
pub const MIN_COMMAND_CHARS: usize = 3;
/// Maximum command length in characters, after trimming.
pub const MAX_COMMAND_CHARS: usize = 1000;

/// Local validation failures. Detected before any cache or network
/// interaction and surfaced as pipeline state, never as `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("empty command")]
    Empty,
    #[error("command shorter than {MIN_COMMAND_CHARS} characters")]
    TooShort,
    #[error("command longer than {MAX_COMMAND_CHARS} characters")]
    TooLong,
}

impl ValidationError {
    pub fn user_message(self) -> &'static str {
        match self {
            ValidationError::Empty => "El comando no puede estar vacío.",
            ValidationError::TooShort => {
                "El comando es demasiado corto. Escribe al menos 3 caracteres."
            }
            ValidationError::TooLong => "El comando es demasiado largo. Máximo 1000 caracteres.",
        }
    }
}

/// Validate free command text. Pure, no side effects.
pub fn validate(text: &str) -> std::result::Result<(), ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    let len = trimmed.chars().count();
    if len < MIN_COMMAND_CHARS {
        Err(ValidationError::TooShort)
    } else if len > MAX_COMMAND_CHARS {
        Err(ValidationError::TooLong)
    } else {
        Ok(())
    }
}

/// Observable pipeline state, cloned out for presentation layers.
#[derive(Debug, Clone, Default)]
pub struct PipelineSnapshot {
    /// A submission is in flight. UI gating only — does not serialize calls.
    pub loading: bool,
    pub result: Option<ResultData>,
    pub suggestions: Vec<Suggestion>,
    pub error: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// The command pipeline.
///
/// All fields use interior mutability, so `CommandPipeline` is `Send + Sync`
/// and can be shared behind an `Arc` between the UI task and event handlers.
pub struct CommandPipeline {
    api: Arc<dyn CommandApi>,
    sink: Arc<dyn ReportSink>,
    cache: Mutex<CommandCache>,
    state: Mutex<PipelineSnapshot>,
    /// Ticket counter for discarding superseded responses.
    issued: AtomicU64,
}

impl CommandPipeline {
    pub fn new(api: Arc<dyn CommandApi>, sink: Arc<dyn ReportSink>) -> Self {
        Self::with_cache(api, sink, CommandCache::new())
    }

    /// Build a pipeline over a pre-configured cache (tests use tighter
    /// limits than the production defaults).
    pub fn with_cache(
        api: Arc<dyn CommandApi>,
        sink: Arc<dyn ReportSink>,
        cache: CommandCache,
    ) -> Self {
        Self {
            api,
            sink,
            cache: Mutex::new(cache),
            state: Mutex::new(PipelineSnapshot::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Current pipeline state.
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.state.lock().clone()
    }

    /// Number of live cache slots (stale entries included until evicted).
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Submit command text: validate, consult the cache, dispatch remotely.
    ///
    /// Returns `true` iff a result payload was produced (cache hit or
    /// backend success) and applied. Validation failures, ambiguous
    /// commands, transport errors and discarded stale responses return
    /// `false`; the outcome is always readable via [`snapshot`].
    ///
    /// [`snapshot`]: CommandPipeline::snapshot
    pub async fn process(&self, text: &str) -> bool {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        {
            let mut state = self.state.lock();
            state.loading = true;
            state.result = None;
            state.error = None;
            state.suggestions.clear();
        }

        if let Err(reason) = validate(text) {
            debug!(%reason, "command rejected locally");
            let mut state = self.state.lock();
            state.loading = false;
            state.error = Some(reason.user_message().to_string());
            return false;
        }

        let trimmed = text.trim();
        let key = CommandCache::normalize_key(trimmed);

        let cached = self.cache.lock().lookup(&key);
        if let Some(data) = cached {
            debug!(%key, "cache hit — skipping dispatch");
            return self.apply(ticket, |state| {
                state.loading = false;
                state.result = Some(data);
            });
        }

        match self.api.process(trimmed).await {
            Ok(resp) if resp.success => match resp.data {
                Some(data) => {
                    let fresh = data.clone();
                    let applied = self.apply(ticket, move |state| {
                        state.loading = false;
                        state.result = Some(data);
                    });
                    // A superseded response is dropped entirely: no state
                    // mutation and no cache write.
                    if applied {
                        self.cache.lock().insert(key, fresh);
                    }
                    applied
                }
                None => {
                    warn!("backend reported success without a payload");
                    self.apply(ticket, |state| {
                        state.loading = false;
                        state.error = Some(GENERIC_COMMAND_ERROR.to_string());
                    });
                    false
                }
            },
            Ok(resp) => {
                // Ambiguous-command path: low confidence, alternatives offered.
                let message = resp
                    .data
                    .as_ref()
                    .and_then(|d| d.error_message.as_deref())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(GENERIC_COMMAND_ERROR)
                    .to_string();
                debug!(suggestions = resp.suggestions.len(), "ambiguous command");
                self.apply(ticket, move |state| {
                    state.loading = false;
                    state.error = Some(message);
                    state.suggestions = resp.suggestions;
                });
                false
            }
            Err(e) => {
                warn!(error = %e, "command dispatch failed");
                let message = e.user_message().to_string();
                self.apply(ticket, move |state| {
                    state.loading = false;
                    state.error = Some(message);
                });
                false
            }
        }
    }

    /// Re-submit a prior history entry verbatim.
    pub async fn reuse(&self, text: &str) -> bool {
        self.process(text).await
    }

    /// Replace the in-memory history list wholesale from the backend.
    ///
    /// Failures are logged and reported through the return value; this
    /// never propagates an error and never touches the error state slot.
    pub async fn fetch_history(&self, query: &HistoryQuery) -> bool {
        match self.api.history(query).await {
            Ok(entries) => {
                debug!(count = entries.len(), "history refreshed");
                self.state.lock().history = entries;
                true
            }
            Err(e) => {
                warn!(error = %e, "history fetch failed — non-fatal");
                false
            }
        }
    }

    /// Export the report for command `id` in the given format.
    ///
    /// PDF/Excel fetch the payload from the backend; JSON serializes the
    /// held result without a network call. On failure the cache and result
    /// state are left untouched.
    ///
    /// Returns the filename handed to the sink.
    pub async fn download_as(
        &self,
        format: DownloadFormat,
        id: u64,
        filename: Option<String>,
    ) -> Result<String> {
        let report_type = {
            let state = self.state.lock();
            state.result.as_ref().and_then(|r| r.report_type.clone())
        };
        let filename = filename.unwrap_or_else(|| {
            default_filename(report_type.as_deref(), id, Utc::now().date_naive(), format)
        });

        let bytes = match format {
            DownloadFormat::Json => {
                let held = self
                    .state
                    .lock()
                    .result
                    .clone()
                    .ok_or(MandatoError::NoResultHeld)?;
                serde_json::to_vec_pretty(&held)
                    .map_err(|e| MandatoError::Other(anyhow::Error::new(e)))?
            }
            DownloadFormat::Pdf | DownloadFormat::Excel => {
                self.api.download(id, format).await.map_err(MandatoError::Api)?
            }
        };

        self.sink.save(&filename, &bytes)?;
        info!(%filename, bytes = bytes.len(), "report export saved");
        Ok(filename)
    }

    /// Reset result, error and suggestions — used before a fresh
    /// submission and when the user dismisses an error.
    pub fn clear_result(&self) {
        let mut state = self.state.lock();
        state.result = None;
        state.error = None;
        state.suggestions.clear();
    }

    /// Empty the cache unconditionally (operator/debug action).
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
        info!("command cache cleared");
    }

    /// Apply a state mutation only while `ticket` is still the latest
    /// issued; a superseded call's response is dropped.
    fn apply<F>(&self, ticket: u64, mutate: F) -> bool
    where
        F: FnOnce(&mut PipelineSnapshot),
    {
        let mut state = self.state.lock();
        if self.issued.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "stale response discarded");
            return false;
        }
        mutate(&mut state);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_lengths_in_range() {
        assert_eq!(validate("abc"), Ok(()));
        assert_eq!(validate("  reporte de ventas  "), Ok(()));
        assert_eq!(validate(&"a".repeat(1000)), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_input() {
        assert_eq!(validate(""), Err(ValidationError::Empty));
        assert_eq!(validate("   "), Err(ValidationError::Empty));
        assert_eq!(validate("\t\n"), Err(ValidationError::Empty));
    }

    #[test]
    fn validate_rejects_short_input() {
        assert_eq!(validate("a"), Err(ValidationError::TooShort));
        assert_eq!(validate("ab"), Err(ValidationError::TooShort));
        // Trimming happens before the length check.
        assert_eq!(validate("  ab  "), Err(ValidationError::TooShort));
    }

    #[test]
    fn validate_rejects_long_input() {
        assert_eq!(validate(&"a".repeat(1001)), Err(ValidationError::TooLong));
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        // 3 multibyte characters: valid even though the byte length is 6.
        assert_eq!(validate("ñññ"), Ok(()));
    }

    #[test]
    fn validation_messages_are_fixed() {
        assert_eq!(
            ValidationError::Empty.user_message(),
            "El comando no puede estar vacío."
        );
        assert_eq!(
            ValidationError::TooShort.user_message(),
            "El comando es demasiado corto. Escribe al menos 3 caracteres."
        );
        assert_eq!(
            ValidationError::TooLong.user_message(),
            "El comando es demasiado largo. Máximo 1000 caracteres."
        );
    }
}
