use std::fmt;

/// Human-facing status of the bridge, emitted only while the console is cooked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// Device path is absent, polling until it appears
    Waiting { path: String },
    /// Serial link opened
    Connected { path: String },
    /// Opening the device needs elevated privileges
    PermissionDenied { path: String, detail: String },
    /// Device vanished mid-session, waiting for it again
    ConnectionLost,
    /// Non-retryable failure
    Unexpected { detail: String },
    /// Process is about to exit
    Farewell,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusEvent::Waiting { path } => write!(f, "Waiting for {}", path),
            StatusEvent::Connected { .. } => write!(f, "Serial connected"),
            StatusEvent::PermissionDenied { detail, .. } => {
                write!(f, "{} - Maybe try with 'sudo'", detail)
            }
            StatusEvent::ConnectionLost => {
                write!(f, "Connection Error: Reinsert the USB serial again")
            }
            StatusEvent::Unexpected { detail } => write!(f, "Unexpected Error: {}", detail),
            StatusEvent::Farewell => write!(f, "Bye"),
        }
    }
}

/// Sink for status events
pub trait StatusReporter: Send + Sync {
    fn report(&self, event: StatusEvent);
}
