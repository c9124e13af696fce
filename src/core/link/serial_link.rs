use super::error::{is_transient, LinkError, OpenError};
use std::io::{self, Read, Write};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Byte stream backing a serial link.
///
/// Reads are expected to time out periodically (`TimedOut`) rather than block
/// forever, so that a cancelled relay can notice and stop.
pub trait LinkPort: Read + Write + Send {
    /// Independent handle to the same device, used to split read and write
    fn try_clone_port(&self) -> io::Result<Box<dyn LinkPort>>;
}

/// Opens serial links for the supervisor
pub trait LinkOpener: Send + Sync {
    fn open(&self, path: &str, baud_rate: u32) -> Result<SerialLink, OpenError>;
}

/// The one open handle to the target device.
///
/// Dropping or closing the link releases the handle; `close` is idempotent.
pub struct SerialLink {
    path: String,
    port: Option<Box<dyn LinkPort>>,
}

impl SerialLink {
    pub fn from_port(path: impl Into<String>, port: Box<dyn LinkPort>) -> Self {
        Self {
            path: path.into(),
            port: Some(port),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Blocking read of one byte. `Ok(None)` means the peer closed the stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        let port = self.port.as_mut().ok_or(LinkError::NotOpen)?;
        read_one(&mut **port, None)
    }

    /// Blocking write of one byte
    pub fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        let port = self.port.as_mut().ok_or(LinkError::NotOpen)?;
        write_one(&mut **port, byte)
    }

    /// Split off the target-to-host direction. Reads stop with
    /// `LinkError::Cancelled` once `cancel` fires.
    pub fn reader(&self, cancel: CancellationToken) -> Result<LinkReader, LinkError> {
        let port = self.port.as_ref().ok_or(LinkError::NotOpen)?;
        let port = port.try_clone_port().map_err(LinkError::from_io)?;
        Ok(LinkReader { port, cancel })
    }

    /// Split off the host-to-target direction
    pub fn writer(&self) -> Result<LinkWriter, LinkError> {
        let port = self.port.as_ref().ok_or(LinkError::NotOpen)?;
        let port = port.try_clone_port().map_err(LinkError::from_io)?;
        Ok(LinkWriter { port })
    }

    /// Release the handle. Safe on an already-closed link.
    pub fn close(&mut self) {
        if let Some(port) = self.port.take() {
            drop(port);
            info!("Serial link {} closed", self.path);
        } else {
            debug!("Serial link {} already closed", self.path);
        }
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Read half of a link, owned by the target-to-host relay
pub struct LinkReader {
    port: Box<dyn LinkPort>,
    cancel: CancellationToken,
}

impl LinkReader {
    pub fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        read_one(&mut *self.port, Some(&self.cancel))
    }
}

/// Write half of a link, owned by the host-to-target relay
pub struct LinkWriter {
    port: Box<dyn LinkPort>,
}

impl LinkWriter {
    pub fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        write_one(&mut *self.port, byte)
    }
}

fn read_one(
    port: &mut dyn LinkPort,
    cancel: Option<&CancellationToken>,
) -> Result<Option<u8>, LinkError> {
    let mut buf = [0u8; 1];
    loop {
        if cancel.map_or(false, CancellationToken::is_cancelled) {
            return Err(LinkError::Cancelled);
        }

        match port.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(ref e) if is_transient(e) => continue,
            Err(e) => return Err(LinkError::from_io(e)),
        }
    }
}

fn write_one(port: &mut dyn LinkPort, byte: u8) -> Result<(), LinkError> {
    loop {
        match port.write(&[byte]) {
            Ok(0) => {
                return Err(LinkError::ConnectionLost(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "serial port accepted no data",
                )))
            }
            Ok(_) => break,
            Err(ref e) if is_transient(e) => continue,
            Err(e) => return Err(LinkError::from_io(e)),
        }
    }

    match port.flush() {
        Ok(()) => Ok(()),
        Err(ref e) if is_transient(e) => Ok(()),
        Err(e) => Err(LinkError::from_io(e)),
    }
}
