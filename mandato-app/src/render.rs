//! Plain-text rendering of pipeline state for the console.

use chrono::DateTime;
use mandato_core::{HistoryEntry, PipelineSnapshot, ResultData, Suggestion};

/// Render the outcome of a submission: result, or error plus suggestions.
pub fn render_outcome(state: &PipelineSnapshot) -> String {
    let mut out = String::new();
    if let Some(result) = &state.result {
        out.push_str(&render_result(result));
    }
    if let Some(error) = &state.error {
        out.push_str(error);
        out.push('\n');
    }
    if !state.suggestions.is_empty() {
        out.push_str(&render_suggestions(&state.suggestions));
    }
    if out.is_empty() {
        out.push_str("(sin resultado)\n");
    }
    out
}

pub fn render_result(result: &ResultData) -> String {
    let mut out = String::new();
    let title = result
        .title
        .as_deref()
        .or(result.report_type.as_deref())
        .unwrap_or("Reporte");
    out.push_str(title);
    out.push('\n');

    if let Some(confidence) = result.confidence {
        out.push_str(&format!("  confianza: {:.0}%\n", confidence * 100.0));
    }
    if let Some(ms) = result.processing_time_ms {
        out.push_str(&format!("  procesado en: {ms} ms\n"));
    }
    if let Some(id) = result.command_id {
        out.push_str(&format!("  comando: #{id}\n"));
    }
    if let Some(summary) = result.extra.get("summary") {
        out.push_str(&format!(
            "  resumen: {}\n",
            serde_json::to_string(summary).unwrap_or_default()
        ));
    }
    out
}

pub fn render_suggestions(suggestions: &[Suggestion]) -> String {
    let mut out = String::from("Quizás quisiste decir:\n");
    for (i, suggestion) in suggestions.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} — \"{}\"\n",
            i + 1,
            suggestion.name,
            suggestion.command
        ));
    }
    out
}

/// Backend timestamps are RFC 3339; anything else is shown verbatim.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "(historial vacío)\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let confidence = entry
            .confidence
            .map(|c| format!("{:.0}%", c * 100.0))
            .unwrap_or_else(|| "—".into());
        let when = entry
            .created_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "—".into());
        out.push_str(&format!(
            "  #{:<6} {:<10?} {:>5}  {}  {}\n",
            entry.id, entry.status, confidence, when, entry.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandato_core::CommandStatus;

    #[test]
    fn outcome_prefers_result_over_placeholder() {
        let mut state = PipelineSnapshot::default();
        state.result = Some(ResultData {
            command_id: Some(3),
            report_type: Some("ventas_mensual".into()),
            title: Some("Ventas del mes".into()),
            confidence: Some(0.92),
            processing_time_ms: Some(120),
            error_message: None,
            extra: serde_json::Map::new(),
        });

        let text = render_outcome(&state);
        assert!(text.contains("Ventas del mes"));
        assert!(text.contains("92%"));
        assert!(text.contains("#3"));
    }

    #[test]
    fn outcome_shows_error_and_suggestions() {
        let mut state = PipelineSnapshot::default();
        state.error = Some("Comando ambiguo.".into());
        state.suggestions = vec![Suggestion {
            name: "Top Productos".into(),
            command: "top productos del mes".into(),
            description: None,
        }];

        let text = render_outcome(&state);
        assert!(text.contains("Comando ambiguo."));
        assert!(text.contains("1. Top Productos"));
    }

    #[test]
    fn empty_state_renders_placeholder() {
        assert_eq!(render_outcome(&PipelineSnapshot::default()), "(sin resultado)\n");
    }

    #[test]
    fn history_lists_entries_or_placeholder() {
        assert_eq!(render_history(&[]), "(historial vacío)\n");

        let entries = vec![HistoryEntry {
            id: 9,
            text: "reporte de ventas".into(),
            status: CommandStatus::Executed,
            confidence: Some(0.88),
            processing_time_ms: Some(100),
            created_at: Some("2026-03-14T10:00:00Z".into()),
        }];
        let text = render_history(&entries);
        assert!(text.contains("#9"));
        assert!(text.contains("reporte de ventas"));
        assert!(text.contains("88%"));
        assert!(text.contains("2026-03-14 10:00"));
    }

    #[test]
    fn unparseable_timestamp_is_shown_verbatim() {
        assert_eq!(format_timestamp("ayer"), "ayer");
    }
}
