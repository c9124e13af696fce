use super::outcome::SessionOutcome;
use crate::core::console::{HostInput, INTERRUPT_BYTE};
use crate::core::link::{LinkError, LinkReader, LinkWriter};
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Why a relay loop stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayEnd {
    Interrupted,
    ConnectionLost(String),
    Failed(String),
    /// Stopped because the other direction (or shutdown) cancelled it
    Cancelled,
}

/// Target to host: copy every byte to the screen, inserting `\r` before `\n`.
pub fn relay_target_to_host(reader: &mut LinkReader, output: &mut dyn Write) -> RelayEnd {
    loop {
        match reader.read_byte() {
            Ok(Some(byte)) => {
                if let Err(e) = write_to_host(output, byte) {
                    return RelayEnd::Failed(format!("host output: {}", e));
                }
            }
            Ok(None) => {
                debug!("Serial stream closed by peer");
                return RelayEnd::ConnectionLost("serial stream closed".to_string());
            }
            Err(e) => return link_failure(e),
        }
    }
}

/// Host to target: forward typed bytes until Ctrl-C.
pub fn relay_host_to_target(
    input: &mut dyn HostInput,
    writer: &mut LinkWriter,
    cancel: &CancellationToken,
    poll_interval: Duration,
) -> RelayEnd {
    loop {
        if cancel.is_cancelled() {
            return RelayEnd::Cancelled;
        }

        let bytes = match input.poll_input(poll_interval) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => continue,
            Err(e) => return RelayEnd::Failed(format!("host input: {}", e)),
        };

        for byte in bytes {
            if byte == INTERRUPT_BYTE {
                debug!("Interrupt byte received from host");
                return RelayEnd::Interrupted;
            }
            if let Err(e) = writer.write_byte(byte) {
                return link_failure(e);
            }
        }
    }
}

/// Raw mode disables the terminal's own newline translation.
pub(crate) fn write_to_host(output: &mut dyn Write, byte: u8) -> io::Result<()> {
    if byte == b'\n' {
        output.write_all(b"\r")?;
    }
    output.write_all(&[byte])?;
    output.flush()
}

fn link_failure(error: LinkError) -> RelayEnd {
    match error {
        LinkError::Cancelled => RelayEnd::Cancelled,
        LinkError::ConnectionLost(_) => RelayEnd::ConnectionLost(error.to_string()),
        LinkError::NotOpen | LinkError::Io(_) => {
            debug!("Serial link failed: {}", error);
            RelayEnd::Failed(error.to_string())
        }
    }
}

/// Fold both relay ends into one outcome. The first non-cancelled end wins.
pub(crate) fn resolve(ends: [RelayEnd; 2], shutdown_requested: bool) -> SessionOutcome {
    for end in ends {
        match end {
            RelayEnd::Cancelled => continue,
            RelayEnd::Interrupted => return SessionOutcome::UserInterrupted,
            RelayEnd::ConnectionLost(reason) => return SessionOutcome::ConnectionLost(reason),
            RelayEnd::Failed(detail) => return SessionOutcome::UnexpectedFailure(detail),
        }
    }

    if shutdown_requested {
        SessionOutcome::UserInterrupted
    } else {
        SessionOutcome::UnexpectedFailure("both relays stopped without a cause".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newline_gets_carriage_return() {
        let mut out = Vec::new();
        for &b in b"a\nb" {
            write_to_host(&mut out, b).unwrap();
        }
        assert_eq!(out, b"a\r\nb");
    }

    #[test]
    fn test_existing_carriage_return_is_kept() {
        let mut out = Vec::new();
        for &b in b"\r\n" {
            write_to_host(&mut out, b).unwrap();
        }
        assert_eq!(out, b"\r\r\n");
    }

    #[test]
    fn test_first_real_end_wins() {
        let outcome = resolve(
            [RelayEnd::ConnectionLost("eof".into()), RelayEnd::Cancelled],
            false,
        );
        assert_eq!(outcome, SessionOutcome::ConnectionLost("eof".into()));

        let outcome = resolve([RelayEnd::Interrupted, RelayEnd::Failed("late".into())], false);
        assert_eq!(outcome, SessionOutcome::UserInterrupted);
    }

    #[test]
    fn test_all_cancelled_resolves_by_shutdown() {
        let ends = || [RelayEnd::Cancelled, RelayEnd::Cancelled];
        assert_eq!(resolve(ends(), true), SessionOutcome::UserInterrupted);
        assert!(matches!(resolve(ends(), false), SessionOutcome::UnexpectedFailure(_)));
    }

    #[test]
    fn test_closed_link_is_not_connection_loss() {
        assert!(matches!(link_failure(LinkError::NotOpen), RelayEnd::Failed(_)));
        assert_eq!(link_failure(LinkError::Cancelled), RelayEnd::Cancelled);
    }

    #[test]
    fn test_unclassified_io_error_is_failure() {
        let error = LinkError::Io(io::Error::new(io::ErrorKind::InvalidData, "framing"));
        assert!(matches!(link_failure(error), RelayEnd::Failed(_)));

        let error = LinkError::ConnectionLost(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert!(matches!(link_failure(error), RelayEnd::ConnectionLost(_)));
    }
}
