use std::io;
use thiserror::Error;

/// Failure of a byte operation on an open link
#[derive(Error, Debug)]
pub enum LinkError {
    /// The device went away: EOF, EIO, hang-up and friends
    #[error("connection lost: {0}")]
    ConnectionLost(#[source] io::Error),

    /// The session asked the relay to stop
    #[error("link operation cancelled")]
    Cancelled,

    /// The link was already closed when used
    #[error("link is not open")]
    NotOpen,

    /// Any other I/O failure
    #[error("link I/O error: {0}")]
    Io(#[source] io::Error),
}

impl LinkError {
    /// Classify a raw I/O error from the port
    pub fn from_io(error: io::Error) -> Self {
        if is_connection_loss(&error) {
            LinkError::ConnectionLost(error)
        } else {
            LinkError::Io(error)
        }
    }

    pub fn is_connection_loss(&self) -> bool {
        matches!(self, LinkError::ConnectionLost(_))
    }
}

/// Failure to open the serial device
#[derive(Error, Debug)]
pub enum OpenError {
    #[error("permission denied opening {path}: {source}")]
    PermissionDenied {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The device disappeared between the presence check and the open
    #[error("device {path} is not available: {source}")]
    Unavailable {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Other {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl OpenError {
    /// Classify a raw I/O error raised while opening `path`
    pub fn from_io(path: &str, source: io::Error) -> Self {
        let path = path.to_string();
        match source.kind() {
            io::ErrorKind::PermissionDenied => OpenError::PermissionDenied { path, source },
            io::ErrorKind::NotFound => OpenError::Unavailable { path, source },
            _ if is_connection_loss(&source) => OpenError::Unavailable { path, source },
            _ => OpenError::Other { path, source },
        }
    }
}

/// Errors that only mean "nothing yet, try again"
pub(crate) fn is_transient(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

fn is_connection_loss(error: &io::Error) -> bool {
    match error.kind() {
        io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::NotConnected => true,
        _ => error.raw_os_error().map_or(false, is_device_gone),
    }
}

// USB-serial adapters report removal as EIO on Linux, ENXIO on macOS.
#[cfg(unix)]
fn is_device_gone(code: i32) -> bool {
    code == libc::EIO || code == libc::ENXIO || code == libc::ENODEV
}

#[cfg(not(unix))]
fn is_device_gone(_code: i32) -> bool {
    false
}
