use crate::core::console::HostConsole;
use crate::core::device::DeviceWatcher;
use crate::core::link::{LinkOpener, OpenError, SerialLink};
use crate::core::session::{BridgeSession, SessionOutcome};
use crate::domain::config::MinitermConfig;
use crate::domain::error::{MinitermError, MinitermResult};
use crate::domain::status::{StatusEvent, StatusReporter};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Timing and link parameters for the supervisor
#[derive(Debug, Clone)]
pub struct SupervisorSettings {
    pub baud_rate: u32,
    pub watch_interval: Duration,
    pub input_poll: Duration,
}

impl SupervisorSettings {
    pub fn from_config(config: &MinitermConfig) -> Self {
        Self {
            baud_rate: config.serial.baud_rate,
            watch_interval: config.watch.poll_interval(),
            input_poll: config.input.poll_interval(),
        }
    }
}

/// Top-level loop: wait for the device, open it, bridge, and decide whether
/// to go around again.
pub struct SessionSupervisor {
    path: String,
    settings: SupervisorSettings,
    opener: Arc<dyn LinkOpener>,
    console: Arc<dyn HostConsole>,
    status: Arc<dyn StatusReporter>,
    shutdown: CancellationToken,
    link: Option<SerialLink>,
}

impl SessionSupervisor {
    pub fn new(
        path: impl Into<String>,
        settings: SupervisorSettings,
        opener: Arc<dyn LinkOpener>,
        console: Arc<dyn HostConsole>,
        status: Arc<dyn StatusReporter>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            path: path.into(),
            settings,
            opener,
            console,
            status,
            shutdown,
            link: None,
        }
    }

    /// Run until the user interrupts or a non-retryable error occurs.
    ///
    /// Whatever the exit path, the link is closed, the console is cooked and
    /// a farewell is reported before this returns.
    pub async fn run(&mut self) -> MinitermResult<()> {
        let result = self.supervise().await;
        self.reset_connection();
        self.status.report(StatusEvent::Farewell);
        result
    }

    async fn supervise(&mut self) -> MinitermResult<()> {
        let watcher = DeviceWatcher::new(self.settings.watch_interval, Arc::clone(&self.status));

        loop {
            tokio::select! {
                _ = watcher.wait_until_present(&self.path) => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested while waiting for {}", self.path);
                    return Ok(());
                }
            }

            let link = match self.opener.open(&self.path, self.settings.baud_rate) {
                Ok(link) => link,
                Err(OpenError::PermissionDenied { path, source }) => {
                    self.status.report(StatusEvent::PermissionDenied {
                        path: path.clone(),
                        detail: source.to_string(),
                    });
                    return Err(MinitermError::PermissionDenied { path, source });
                }
                Err(e @ OpenError::Unavailable { .. }) => {
                    warn!("{}", e);
                    if !self.pause().await {
                        return Ok(());
                    }
                    continue;
                }
                Err(e @ OpenError::Other { .. }) => {
                    let message = e.to_string();
                    error!("{}", message);
                    self.status.report(StatusEvent::Unexpected {
                        detail: message.clone(),
                    });
                    return Err(MinitermError::Unexpected { message });
                }
            };

            info!("Connected to {} at {} baud", self.path, self.settings.baud_rate);
            self.status.report(StatusEvent::Connected {
                path: self.path.clone(),
            });

            let link = self.link.insert(link);
            let mut session = BridgeSession::new(
                Arc::clone(&self.console),
                self.shutdown.clone(),
                self.settings.input_poll,
            );
            let outcome = session.run(link).await;
            self.reset_connection();

            if outcome.is_retryable() {
                warn!("Session on {} ended, waiting again: {}", self.path, outcome);
                self.status.report(StatusEvent::ConnectionLost);
                continue;
            }

            return match outcome {
                SessionOutcome::UnexpectedFailure(message) => {
                    self.status.report(StatusEvent::Unexpected {
                        detail: message.clone(),
                    });
                    Err(MinitermError::Unexpected { message })
                }
                _ => Ok(()),
            };
        }
    }

    /// Sleep one watch interval; false if shutdown arrived first
    async fn pause(&self) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(self.settings.watch_interval) => true,
            _ = self.shutdown.cancelled() => false,
        }
    }

    fn reset_connection(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close();
        }
        if let Err(e) = self.console.disable_raw() {
            debug!("Console restore during reset failed: {}", e);
        }
    }
}
