//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; compilation is delegated to ExportService.

use dotenv::dotenv;
use quest_ics::adapters::persistence::IcsFileSink;
use quest_ics::adapters::source::open_source;
use quest_ics::adapters::ui::tui::{TuiInputPort, prompt_input_path};
use quest_ics::domain::document::HOME_TIME_ZONE;
use quest_ics::ports::{CalendarSinkPort, InputPort};
use quest_ics::shared::config::AppConfig;
use quest_ics::usecases::ExportService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    // --- Input: config, then first CLI argument, then prompt ---
    let input_path = match cfg
        .input_path
        .clone()
        .or_else(|| std::env::args().nth(1))
    {
        Some(path) => PathBuf::from(path),
        None => prompt_input_path().map_err(|e| anyhow::anyhow!("{}", e))?,
    };
    info!(path = %input_path.display(), "schedule input");

    let source = open_source(&input_path, cfg.student_name.clone())
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // --- Output ---
    let output_dir = cfg.output_dir_or_default();
    info!(path = %output_dir, "output directory");
    let sink: Arc<dyn CalendarSinkPort> = Arc::new(IcsFileSink::new(&output_dir));

    // --- Services ---
    let options = cfg
        .compile_options()
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let header = cfg.calendar_header();
    info!(
        time_zone = HOME_TIME_ZONE,
        date_format = %options.date_format,
        anchor = %options.anchor_strategy,
        "calendar settings"
    );
    let export_service = Arc::new(ExportService::new(source, sink, options, header));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&export_service),
        cfg.assume_yes_or_default(),
    ));

    input_port
        .run_export()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
