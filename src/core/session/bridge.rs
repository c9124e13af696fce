use super::outcome::{SessionOutcome, SessionState};
use super::relay::{self, RelayEnd};
use crate::core::console::{HostConsole, RawConsoleGuard};
use crate::core::link::{LinkError, LinkReader, LinkWriter, SerialLink};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// One interactive session over an open link.
///
/// Both relay directions run on blocking worker threads because serial and
/// keyboard reads block. They share a child of the process shutdown token:
/// whichever side ends first cancels the other, and both are joined before
/// `run` returns.
pub struct BridgeSession {
    console: Arc<dyn HostConsole>,
    shutdown: CancellationToken,
    input_poll: Duration,
    state: SessionState,
}

impl BridgeSession {
    pub fn new(
        console: Arc<dyn HostConsole>,
        shutdown: CancellationToken,
        input_poll: Duration,
    ) -> Self {
        Self {
            console,
            shutdown,
            input_poll,
            state: SessionState::Starting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Relay bytes until Ctrl-C, shutdown, or link failure
    pub async fn run(&mut self, link: &SerialLink) -> SessionOutcome {
        self.transition(SessionState::Starting);

        let outcome = match RawConsoleGuard::enter(Arc::clone(&self.console)) {
            Ok(guard) => {
                let outcome = self.relay(link).await;
                drop(guard);
                outcome
            }
            Err(e) => SessionOutcome::UnexpectedFailure(format!("failed to enter raw mode: {}", e)),
        };

        self.transition(SessionState::terminal_for(&outcome));
        self.transition(SessionState::Ended);

        match &outcome {
            SessionOutcome::UnexpectedFailure(detail) => {
                error!("Session on {} failed: {}", link.path(), detail)
            }
            other => info!("Session on {} ended: {}", link.path(), other),
        }
        outcome
    }

    async fn relay(&mut self, link: &SerialLink) -> SessionOutcome {
        let cancel = self.shutdown.child_token();

        let (mut reader, mut writer) = match split(link, cancel.clone()) {
            Ok(halves) => halves,
            Err(e) => return setup_failure(e),
        };
        let mut input = self.console.input();
        let mut output = self.console.output();
        let input_poll = self.input_poll;
        let input_cancel = cancel.clone();

        self.transition(SessionState::Running);

        let mut target_to_host = tokio::task::spawn_blocking(move || {
            relay::relay_target_to_host(&mut reader, output.as_mut())
        });
        let mut host_to_target = tokio::task::spawn_blocking(move || {
            relay::relay_host_to_target(input.as_mut(), &mut writer, &input_cancel, input_poll)
        });

        let ends = tokio::select! {
            end = &mut target_to_host => {
                cancel.cancel();
                [joined(end), joined(host_to_target.await)]
            }
            end = &mut host_to_target => {
                cancel.cancel();
                [joined(end), joined(target_to_host.await)]
            }
        };
        debug!("Relays joined: {:?}", ends);

        relay::resolve(ends, self.shutdown.is_cancelled())
    }

    fn transition(&mut self, next: SessionState) {
        debug!("Session state {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn split(
    link: &SerialLink,
    cancel: CancellationToken,
) -> Result<(LinkReader, LinkWriter), LinkError> {
    Ok((link.reader(cancel)?, link.writer()?))
}

fn joined(result: Result<RelayEnd, JoinError>) -> RelayEnd {
    result.unwrap_or_else(|e| RelayEnd::Failed(format!("relay task failed: {}", e)))
}

fn setup_failure(error: LinkError) -> SessionOutcome {
    if error.is_connection_loss() {
        SessionOutcome::ConnectionLost(error.to_string())
    } else {
        SessionOutcome::UnexpectedFailure(format!("failed to split serial link: {}", error))
    }
}
