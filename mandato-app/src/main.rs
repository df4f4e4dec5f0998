//! Mandato console host.
//!
//! Line-oriented front end over [`mandato_core`]: free text is dispatched
//! through the command pipeline, `:` prefixed lines drive the console
//! (history, report downloads, cache control, a scripted dictation demo).

mod render;
mod session;
mod settings;
mod sink;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use mandato_core::{
    CommandApi, CommandPipeline, HistoryQuery, HttpCommandApi, NullRecognizer, RecognizerConfig,
    RecognizerEvent, SpeechCapture, SpeechRecognizer, StubRecognizer,
};
use mandato_core::session::AUTH_TOKEN_KEY;
use render::{render_history, render_outcome};
use session::FileSessionStore;
use settings::{default_session_path, default_settings_path, load_settings, AppSettings};
use sink::FsReportSink;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

const HELP: &str = "\
Comandos de consola:
  :historial [página]   cargar historial de comandos
  :pdf <id>             descargar reporte PDF
  :excel <id>           descargar reporte Excel
  :json <id>            exportar el resultado en pantalla como JSON
  :limpiar              vaciar caché y resultado actual
  :token [valor]        fijar o borrar el token de sesión
  :voz                  demo de dictado
  :ayuda                mostrar esta ayuda
  :salir                terminar
Cualquier otra línea se envía como comando.";

fn parse_id(arg: Option<&str>) -> Option<u64> {
    match arg.map(str::parse::<u64>) {
        Some(Ok(id)) => Some(id),
        _ => {
            println!("Uso: :pdf|:excel|:json <id numérico>");
            None
        }
    }
}

async fn download(
    pipeline: &CommandPipeline,
    format: mandato_core::DownloadFormat,
    arg: Option<&str>,
) {
    let Some(id) = parse_id(arg) else { return };
    match pipeline.download_as(format, id, None).await {
        Ok(filename) => println!("Guardado: {filename}"),
        Err(e) => println!("{}", e.user_message()),
    }
}

/// Scripted utterance for the `:voz` demo. Interim hypotheses are shown
/// as they would arrive from a live engine; the final one is dispatched.
fn demo_script() -> Vec<RecognizerEvent> {
    vec![
        RecognizerEvent::Hypothesis {
            text: "ventas".into(),
            is_final: false,
        },
        RecognizerEvent::Hypothesis {
            text: "ventas del mes".into(),
            is_final: false,
        },
        RecognizerEvent::Hypothesis {
            text: "ventas del mes actual".into(),
            is_final: true,
        },
    ]
}

async fn run_dictation(pipeline: &CommandPipeline, settings: &AppSettings) {
    let recognizer: Box<dyn SpeechRecognizer> = match settings.recognizer.as_str() {
        "stub" => Box::new(StubRecognizer::with_config(RecognizerConfig {
            locale: settings.locale.clone(),
            ..RecognizerConfig::default()
        })),
        _ => Box::new(NullRecognizer::new()),
    };
    let mut capture = SpeechCapture::new(recognizer);

    if capture.start().is_err() || capture.error().is_some() {
        if let Some(msg) = capture.error() {
            println!("{msg}");
        }
        return;
    }

    for event in demo_script() {
        capture.on_event(event);
        println!("  … {}", capture.transcript());
    }
    if capture.stop().is_ok() {
        capture.on_event(RecognizerEvent::Ended);
    }

    if let Some(msg) = capture.error() {
        println!("{msg}");
        return;
    }
    let text = capture.transcript().to_string();
    if text.is_empty() {
        println!("(sin dictado)");
        return;
    }
    println!("Dictado: {text}");
    pipeline.process(&text).await;
    print!("{}", render_outcome(&pipeline.snapshot()));
}

/// Handle one `:` command. Returns `false` when the console should exit.
async fn run_console_command(
    command: &str,
    pipeline: &CommandPipeline,
    session: &FileSessionStore,
    settings: &AppSettings,
) -> bool {
    use mandato_core::DownloadFormat;
    use mandato_core::SessionStore as _;

    let mut parts = command.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let arg = parts.next();

    match verb {
        "salir" | "q" => return false,
        "ayuda" => println!("{HELP}"),
        "historial" => {
            let query = HistoryQuery {
                page: arg.and_then(|a| a.parse().ok()).unwrap_or(1),
                page_size: settings.history_page_size,
            };
            if pipeline.fetch_history(&query).await {
                print!("{}", render_history(&pipeline.snapshot().history));
            } else {
                println!("No se pudo cargar el historial. Intenta de nuevo.");
            }
        }
        "pdf" => download(pipeline, DownloadFormat::Pdf, arg).await,
        "excel" => download(pipeline, DownloadFormat::Excel, arg).await,
        "json" => download(pipeline, DownloadFormat::Json, arg).await,
        "limpiar" => {
            pipeline.clear_cache();
            pipeline.clear_result();
            println!("Caché y resultado vaciados.");
        }
        "token" => match arg {
            Some(value) => {
                session.set(AUTH_TOKEN_KEY, value);
                println!("Token de sesión actualizado.");
            }
            None => {
                session.remove(AUTH_TOKEN_KEY);
                println!("Token de sesión borrado.");
            }
        },
        "voz" => run_dictation(pipeline, settings).await,
        other => println!("Comando desconocido: :{other} (usa :ayuda)"),
    }
    true
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mandato=info")),
        )
        .init();

    info!("Mandato starting");

    let settings_path = default_settings_path();
    let app_settings = load_settings(&settings_path);
    info!(
        settings_path = ?settings_path,
        backend_url = %app_settings.backend_url,
        recognizer = %app_settings.recognizer,
        history_page_size = app_settings.history_page_size,
        "runtime settings loaded"
    );

    let session = Arc::new(FileSessionStore::open(default_session_path()));
    let api: Arc<dyn CommandApi> = Arc::new(HttpCommandApi::with_timeout(
        app_settings.backend_url.clone(),
        session.clone(),
        Duration::from_secs(app_settings.request_timeout_secs),
    ));
    let sink = Arc::new(FsReportSink::new(app_settings.resolved_download_dir()));
    let pipeline = CommandPipeline::new(api, sink);

    println!("Mandato — consola de comandos de voz");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(command) = line.strip_prefix(':') {
            if !run_console_command(command, &pipeline, &session, &app_settings).await {
                break;
            }
        } else {
            pipeline.process(line).await;
            print!("{}", render_outcome(&pipeline.snapshot()));
        }
    }

    info!("Mandato exiting");
    Ok(())
}
