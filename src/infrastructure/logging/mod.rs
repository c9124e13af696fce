// Logging module - Logging infrastructure
use crate::domain::config::LogConfig;
use crate::domain::error::{MinitermError, MinitermResult};
use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging system.
///
/// Logs go to stderr unless a file is configured. RUST_LOG takes precedence
/// over the configured level.
pub fn init_logging(config: &LogConfig) -> MinitermResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match &config.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| MinitermError::Config {
                    message: format!("Failed to open log file {}: {}", path.display(), e),
                })?;

            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .try_init()
        }
        None => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init(),
    };

    result.map_err(|e| MinitermError::Config {
        message: format!("Failed to install log subscriber: {}", e),
    })?;

    tracing::debug!("Miniterm logging system initialized");
    Ok(())
}

fn default_directive(level: &str) -> String {
    format!("miniterm={}", level)
}
