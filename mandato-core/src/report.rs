//! Report export formats, default filenames, and the save-side-effect seam.

use chrono::NaiveDate;

/// Export format for a command's report payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadFormat {
    Pdf,
    Excel,
    /// Serialized locally from the held result payload; no network call.
    Json,
}

impl DownloadFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Excel => "xlsx",
            DownloadFormat::Json => "json",
        }
    }

    /// URL path segment of the per-command download endpoint, `None` for
    /// the local-only JSON export.
    pub fn endpoint_segment(self) -> Option<&'static str> {
        match self {
            DownloadFormat::Pdf => Some("pdf"),
            DownloadFormat::Excel => Some("excel"),
            DownloadFormat::Json => None,
        }
    }
}

/// Receives the bytes of a finished export.
///
/// The app writes to disk; tests record the call. Splitting this out keeps
/// the pipeline free of filesystem access.
pub trait ReportSink: Send + Sync {
    fn save(&self, filename: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Default export filename: `{cleaned_report_type}_{yyyy-mm-dd}_{id}.{ext}`.
pub fn default_filename(
    report_type: Option<&str>,
    id: u64,
    date: NaiveDate,
    format: DownloadFormat,
) -> String {
    let cleaned = clean_report_type(report_type.unwrap_or(""));
    format!(
        "{cleaned}_{}_{id}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Lower-case the report type and keep only filename-safe characters;
/// whitespace collapses to single underscores. Falls back to `"reporte"`.
fn clean_report_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_sep = true;
    for c in raw.trim().to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        "reporte".to_string()
    } else {
        out
    }
}
