//! `HttpCommandApi` — reqwest-backed implementation of [`CommandApi`].
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation | Route |
//! |-----------|-------|
//! | process   | `POST /api/voice-commands/process/` |
//! | history   | `GET /api/voice-commands/history/?page=&page_size=` |
//! | download  | `GET /api/voice-commands/{id}/download/{pdf\|excel}/` |
//!
//! The bearer token is read from the injected [`SessionStore`] on every
//! request, so a login elsewhere in the app takes effect immediately.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::api::{error_message_of, ApiError, CommandApi};
use crate::report::DownloadFormat;
use crate::session::{SessionStore, AUTH_TOKEN_KEY};
use crate::types::{CommandResponse, HistoryEntry, HistoryQuery, ResultData};

/// Default per-request timeout. The original client documented but never
/// enforced one; here it is real and maps to the timeout user message.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpCommandApi {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpCommandApi {
    /// Build an API client for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self::with_timeout(base_url, session, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Build an API client with an explicit per-request timeout.
    ///
    /// A default (no-timeout) client is the last-resort fallback if the
    /// builder fails, which does not happen with these options in practice.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
        }
    }

    /// Attach `Authorization: Bearer …` only when a non-empty token is held.
    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.get(AUTH_TOKEN_KEY) {
            Some(token) if !token.trim().is_empty() => req.bearer_auth(token),
            _ => req,
        }
    }

    fn check_status(response: &reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl CommandApi for HttpCommandApi {
    async fn process(&self, text: &str) -> Result<CommandResponse, ApiError> {
        let url = format!("{}/api/voice-commands/process/", self.base_url);
        debug!(chars = text.chars().count(), "dispatching command");

        let response = self
            .authorize(self.client.post(&url))
            .json(&json!({ "text": text }))
            .send()
            .await?;
        Self::check_status(&response)?;

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let mut envelope: CommandResponse = serde_json::from_value(payload.clone())
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        // Failure envelopes sometimes carry their message in a top-level
        // `error`/`detail`/`message` field instead of `data.error_message`;
        // fold those into the typed shape so callers see one slot.
        if !envelope.success {
            let has_message = envelope
                .data
                .as_ref()
                .and_then(|d| d.error_message.as_deref())
                .is_some_and(|m| !m.trim().is_empty());
            if !has_message {
                if let Some(message) = error_message_of(&payload) {
                    envelope
                        .data
                        .get_or_insert_with(ResultData::default)
                        .error_message = Some(message);
                }
            }
        }
        Ok(envelope)
    }

    async fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, ApiError> {
        let url = format!("{}/api/voice-commands/history/", self.base_url);
        let response = self
            .authorize(self.client.get(&url))
            .query(&[("page", query.page), ("page_size", query.page_size)])
            .send()
            .await?;
        Self::check_status(&response)?;

        // The endpoint serves either a bare array or a paginated envelope
        // with a `results` array; accept both shapes.
        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let items = match payload {
            serde_json::Value::Array(items) => items,
            serde_json::Value::Object(mut map) => match map.remove("results") {
                Some(serde_json::Value::Array(items)) => items,
                _ => return Err(ApiError::Decode("unexpected history payload shape".into())),
            },
            _ => return Err(ApiError::Decode("unexpected history payload shape".into())),
        };

        items
            .into_iter()
            .map(|item| {
                serde_json::from_value::<HistoryEntry>(item)
                    .map_err(|e| ApiError::Decode(e.to_string()))
            })
            .collect()
    }

    async fn download(&self, id: u64, format: DownloadFormat) -> Result<Vec<u8>, ApiError> {
        let segment = format
            .endpoint_segment()
            .ok_or_else(|| ApiError::Transport("JSON export never hits the network".into()))?;
        let url = format!(
            "{}/api/voice-commands/{id}/download/{segment}/",
            self.base_url
        );
        debug!(id, segment, "downloading report payload");

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::check_status(&response)?;

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpCommandApi::new(
            "https://backend.example/",
            Arc::new(MemorySessionStore::new()),
        );
        assert_eq!(api.base_url, "https://backend.example");
    }

    /// `HttpCommandApi` must be usable as `dyn CommandApi`.
    #[test]
    fn api_is_object_safe() {
        let api: Arc<dyn CommandApi> = Arc::new(HttpCommandApi::new(
            "http://localhost:8000",
            Arc::new(MemorySessionStore::new()),
        ));
        drop(api);
    }
}
