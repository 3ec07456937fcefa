// lolwatch entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels
// 4. Open the session (connects in the background)
// 5. Spawn app loop task
// 6. Run the TUI until the user quits
// 7. Wait for the app loop to dispose the session

use std::path::PathBuf;

use anyhow::Context;
use directories::ProjectDirs;
use tokio::sync::mpsc;
use tracing::{error, info};

use lolwatch_core::config;
use lolwatch_core::session::Session;
use lolwatch_tui::app;
use lolwatch_tui::tui::{self, ViewState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_path = init_tracing()?;
    info!("lolwatch starting up (logging to {})", log_path.display());

    let config = config::load_config().context("failed to load configuration")?;
    let identity = config.identity_message();
    let endpoint = config.server.url.trim().to_string();
    info!(
        "Config loaded: endpoint={}, identity={}",
        endpoint,
        identity.to_wire()
    );

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let view_state = ViewState::new(endpoint.clone(), identity.to_wire());
    let session = Session::open(endpoint, identity);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(session, cmd_rx, ui_tx).await {
            error!("Application loop error: {e:#}");
        }
    });

    if let Err(e) = tui::run(ui_rx, cmd_tx, view_state).await {
        error!("TUI error: {e:#}");
    }

    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), app_handle).await;

    info!("lolwatch shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
/// Returns the log file path.
fn init_tracing() -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match ProjectDirs::from("gg", "lolwatch", "lolwatch") {
        Some(dirs) => dirs.data_local_dir().join("logs"),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join("lolwatch.log");
    let log_file = std::fs::File::create(&log_path)?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("lolwatch_core=info,lolwatch_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(log_path)
}
