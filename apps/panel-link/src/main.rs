use panel_link::error::PanelLinkError;
use panel_link::logger::{DEFAULT_LOG_LEVEL, initialize as LoggerInitialize};
use panel_link::monitor::{report_until, shutdown_signal};

use link_core::config::{LinkConfig, default_config_dir, load_dotenv};
use link_core::session::{SessionHandle, SessionSettings};

use common::{ErrorLocation, SystemClock};

use std::fs::create_dir_all;
use std::panic::Location;
use std::process::ExitCode;
use std::sync::Arc;

use log::{error, info};
use tokio::runtime::Builder as RuntimeBuilder;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), PanelLinkError> {
    let dotenv_path = load_dotenv();

    let config_dir = default_config_dir()?;
    let mut config = LinkConfig::load(&config_dir)?;
    config.apply_env_overrides()?;

    let log_dir = config.log_dir(&config_dir);
    create_dir_all(&log_dir).map_err(|e| PanelLinkError::PanelLink {
        message: format!("Failed to create log directory {}: {e}", log_dir.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST; nothing above this line is recorded
    LoggerInitialize(&log_dir, config.log_level()?.unwrap_or(DEFAULT_LOG_LEVEL))?;

    info!("Panel link starting");
    info!("Config directory: {}", config_dir.display());
    info!("Log directory: {}", log_dir.display());
    if let Some(path) = dotenv_path {
        info!("Environment loaded from {}", path.display());
    }

    let url = config.controller_url()?;
    let settings = SessionSettings::from(&config);
    info!(
        "Controller at {url}, retry every {} ms",
        settings.connection.retry_interval.as_millis()
    );

    let runtime = RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| PanelLinkError::Runtime {
            message: format!("Failed to build async runtime: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

    runtime.block_on(async {
        let session = SessionHandle::spawn(url, settings, Arc::new(SystemClock));
        report_until(&session, shutdown_signal()).await;
        session.shutdown().await;
    });

    info!("Panel link stopped");
    Ok(())
}
