use crate::cli::args::Args;
use crate::cli::output::ConsoleStatus;
use crate::core::{SessionSupervisor, SupervisorSettings};
use crate::infrastructure::config::ConfigManager;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::serial::SerialPortOpener;
use crate::infrastructure::terminal::{install_panic_hook, CrosstermConsole};
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Exit status used when a second interrupt forces the process down
const FORCED_EXIT_CODE: i32 = 130;

/// Run the serial console until the user quits or a fatal error occurs
pub async fn execute(args: Args) -> anyhow::Result<()> {
    let config_manager = ConfigManager::new();
    let config = match &args.config {
        Some(path) => config_manager.load_config_from_path(path),
        None => config_manager.load_config(),
    }
    .context("Failed to load configuration")?;

    init_logging(&config.log).context("Failed to initialize logging")?;
    install_panic_hook();

    let status = Arc::new(ConsoleStatus::stdout());
    status.banner(&args.device);

    let shutdown = CancellationToken::new();
    spawn_interrupt_listener(shutdown.clone());

    let mut supervisor = SessionSupervisor::new(
        args.device.clone(),
        SupervisorSettings::from_config(&config),
        Arc::new(SerialPortOpener::new(config.serial.read_timeout())),
        Arc::new(CrosstermConsole::new()),
        status,
        shutdown,
    );

    supervisor
        .run()
        .await
        .with_context(|| format!("Serial console on {} stopped", args.device))
}

/// SIGINT only arrives outside raw mode (mainly while waiting for the
/// device); it takes the same exit path as a typed Ctrl-C. A second signal
/// exits immediately.
fn spawn_interrupt_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for interrupt signal: {}", e);
                return;
            }

            if shutdown.is_cancelled() {
                let _ = crossterm::terminal::disable_raw_mode();
                std::process::exit(FORCED_EXIT_CODE);
            }

            info!("Interrupt signal received, shutting down");
            shutdown.cancel();
        }
    });
}
