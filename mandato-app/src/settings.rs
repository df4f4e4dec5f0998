//! Persistent application settings (JSON file in app data directory).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct AppSettings {
    /// Base URL of the command backend.
    pub backend_url: String,
    /// Recognition locale hint.
    pub locale: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Page size for history fetches.
    pub history_page_size: usize,
    /// Directory report downloads are written to. `None` selects the
    /// platform default.
    pub download_dir: Option<PathBuf>,
    /// Recognition backend: `"null"` (unsupported) or `"stub"` (scripted demo).
    pub recognizer: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            locale: "es-ES".into(),
            request_timeout_secs: 30,
            history_page_size: 20,
            download_dir: None,
            recognizer: "null".into(),
        }
    }
}

impl AppSettings {
    pub fn normalize(&mut self) {
        self.backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        if self.backend_url.is_empty() {
            self.backend_url = "http://localhost:8000".into();
        }
        self.locale = normalize_locale(&self.locale);
        self.request_timeout_secs = self.request_timeout_secs.clamp(1, 300);
        self.history_page_size = self.history_page_size.clamp(1, 100);
        self.recognizer = normalize_recognizer(&self.recognizer);
        self.download_dir = self
            .download_dir
            .as_ref()
            .filter(|d| !d.as_os_str().is_empty())
            .cloned();
    }

    /// Resolved download directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(default_download_dir)
    }
}

pub fn normalize_locale(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "es-ES".into()
    } else {
        trimmed.into()
    }
}

pub fn normalize_recognizer(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "stub" | "demo" => "stub".into(),
        _ => "null".into(),
    }
}

pub fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Andamio Labs")
            .join("Mandato")
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var_os("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("/tmp"))
                    .join(".local")
                    .join("share")
            })
            .join("mandato")
    }
}

pub fn default_settings_path() -> PathBuf {
    default_data_dir().join("settings.json")
}

pub fn default_session_path() -> PathBuf {
    default_data_dir().join("session.json")
}

fn default_download_dir() -> PathBuf {
    default_data_dir().join("descargas")
}

pub fn load_settings(path: &Path) -> AppSettings {
    let mut settings = fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<AppSettings>(&raw).ok())
        .unwrap_or_default();
    settings.normalize();
    settings
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings).map_err(std::io::Error::other)?;
    fs::write(path, json)
}
