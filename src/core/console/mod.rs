// Console module - Host keyboard/screen abstraction
pub mod guard;

pub use guard::RawConsoleGuard;

use std::io::{self, Write};
use std::time::Duration;

/// Ctrl-C as it arrives from a raw-mode keyboard
pub const INTERRUPT_BYTE: u8 = 0x03;

/// Input mode of the host console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleMode {
    Raw,
    Cooked,
}

/// The host side of the bridge: terminal mode control plus byte-level I/O
pub trait HostConsole: Send + Sync {
    fn enable_raw(&self) -> io::Result<()>;
    fn disable_raw(&self) -> io::Result<()>;
    fn mode(&self) -> ConsoleMode;
    /// Keyboard source for one session
    fn input(&self) -> Box<dyn HostInput>;
    /// Screen sink for one session
    fn output(&self) -> Box<dyn Write + Send>;
}

/// Keyboard source
pub trait HostInput: Send {
    /// Bytes of one typed character, or `None` if nothing arrived within `timeout`
    fn poll_input(&mut self, timeout: Duration) -> io::Result<Option<Vec<u8>>>;
}
