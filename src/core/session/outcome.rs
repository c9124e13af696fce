use std::fmt;

/// How a bridge session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Ctrl-C typed in the session, or SIGINT delivered to the process
    UserInterrupted,
    /// The device went away; worth waiting for it again
    ConnectionLost(String),
    /// Anything else; not retried
    UnexpectedFailure(String),
}

impl SessionOutcome {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionOutcome::ConnectionLost(_))
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::UserInterrupted => write!(f, "interrupted by user"),
            SessionOutcome::ConnectionLost(reason) => write!(f, "connection lost: {}", reason),
            SessionOutcome::UnexpectedFailure(detail) => write!(f, "unexpected failure: {}", detail),
        }
    }
}

/// Lifecycle of a single session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Starting,
    Running,
    Interrupted,
    Lost,
    Failed,
    Ended,
}

impl SessionState {
    pub(crate) fn terminal_for(outcome: &SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::UserInterrupted => SessionState::Interrupted,
            SessionOutcome::ConnectionLost(_) => SessionState::Lost,
            SessionOutcome::UnexpectedFailure(_) => SessionState::Failed,
        }
    }
}
