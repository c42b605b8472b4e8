use anyhow::Result;
use match_predictor::config::Config;
use match_predictor::engine::catalog::load_catalog;
use match_predictor::service::http::HttpPredictionService;
use match_predictor::service::simulated::SimulatedService;
use match_predictor::service::types::PredictionResult;
use match_predictor::service::PredictionService;
use match_predictor::tui::{self, state::AppState, TuiCommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "match-predictor.log";
const DEFAULT_CONFIG: &str = "config.toml";

fn config_path() -> PathBuf {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return PathBuf::from(path);
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return PathBuf::from(path);
        }
    }
    PathBuf::from(DEFAULT_CONFIG)
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("match_predictor=info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let sim_mode = std::env::args().any(|arg| arg == "--simulate");

    // Saved settings from .env (real env vars take precedence)
    Config::load_env_file();
    let mut config = Config::load_or_default(&config_path())?;
    config.apply_env_overrides();

    println!();
    println!("  Match Predictor v{}", env!("CARGO_PKG_VERSION"));
    println!("  ======================");
    println!();

    let service: Arc<dyn PredictionService> = if sim_mode {
        println!("  ** SIMULATION MODE ** (no prediction service required)");
        Arc::new(SimulatedService::new(Duration::from_millis(
            config.simulation.latency_ms,
        )))
    } else {
        println!("  Prediction service: {}", config.service.base_url);
        Arc::new(HttpPredictionService::new(&config.service)?)
    };

    println!("  Loading team catalog...");
    let catalog = load_catalog(&config.catalog, service.as_ref()).await;
    match &catalog {
        Some(c) => println!("  {} teams available. Starting UI...", c.len()),
        None => println!("  No catalog, team names are free text. Starting UI..."),
    }
    tracing::info!(
        service = %service.label(),
        sim_mode,
        catalog = catalog.as_ref().map(|c| c.len()).unwrap_or(0),
        "starting"
    );

    let mut state = AppState::new(config.form.default_mode, catalog);
    state.sim_mode = sim_mode;
    state.service_label = service.label();
    state.push_log("INFO", format!("Prediction service: {}", state.service_label));

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<TuiCommand>(16);
    let (result_tx, result_rx) = mpsc::channel::<PredictionResult>(16);

    // Request worker: one exchange per Predict command, results back to the TUI.
    let worker_service = service.clone();
    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                TuiCommand::Predict(selection) => {
                    let service = worker_service.clone();
                    let result_tx = result_tx.clone();
                    tokio::spawn(async move {
                        let result = service.predict(&selection).await;
                        let _ = result_tx.send(result).await;
                    });
                }
                TuiCommand::Quit => break,
            }
        }
    });

    tui::run_tui(state, cmd_tx, result_rx).await?;

    tracing::debug!("shutting down");
    Ok(())
}
