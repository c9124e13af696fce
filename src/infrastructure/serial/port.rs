use crate::core::link::{LinkOpener, LinkPort, OpenError, SerialLink};
use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::info;

// serialport reports these errno values as `ErrorKind::Other` carrying only
// the errno text, which is what an unplugged USB adapter produces.
#[cfg(unix)]
const DEVICE_GONE: [(&str, i32); 4] = [
    ("I/O error", libc::EIO),
    ("Input/output error", libc::EIO),
    ("No such device or address", libc::ENXIO),
    ("No such device", libc::ENODEV),
];

/// A `serialport` handle whose I/O errors keep their OS error code
struct SerialDevice {
    port: Box<dyn SerialPort>,
}

impl Read for SerialDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.port.read(buf).map_err(restore_os_error)
    }
}

impl Write for SerialDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf).map_err(restore_os_error)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.port.flush().map_err(restore_os_error)
    }
}

impl LinkPort for SerialDevice {
    fn try_clone_port(&self) -> io::Result<Box<dyn LinkPort>> {
        let port = self.port.try_clone().map_err(io::Error::from)?;
        Ok(Box::new(SerialDevice { port }))
    }
}

#[cfg(unix)]
fn restore_os_error(error: io::Error) -> io::Error {
    if error.kind() != io::ErrorKind::Other || error.raw_os_error().is_some() {
        return error;
    }
    let text = error.to_string();
    match DEVICE_GONE.iter().find(|(desc, _)| *desc == text) {
        Some(&(_, code)) => io::Error::from_raw_os_error(code),
        None => error,
    }
}

#[cfg(not(unix))]
fn restore_os_error(error: io::Error) -> io::Error {
    error
}

/// Opens real serial devices through `serialport`.
///
/// Line settings stay at the platform defaults (8N1, no flow control); only
/// the baud rate is set.
#[derive(Debug, Clone)]
pub struct SerialPortOpener {
    read_timeout: Duration,
}

impl SerialPortOpener {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }
}

impl LinkOpener for SerialPortOpener {
    fn open(&self, path: &str, baud_rate: u32) -> Result<SerialLink, OpenError> {
        let port = serialport::new(path, baud_rate)
            .timeout(self.read_timeout)
            .open()
            .map_err(|e| OpenError::from_io(path, io::Error::from(e)))?;

        info!("Serial port {} opened at {} baud", path, baud_rate);
        Ok(SerialLink::from_port(path, Box::new(SerialDevice { port })))
    }
}

impl SerialLink {
    /// Open `path` at a fixed `baud_rate`
    pub fn open(path: &str, baud_rate: u32, read_timeout: Duration) -> Result<Self, OpenError> {
        SerialPortOpener::new(read_timeout).open(path, baud_rate)
    }
}
