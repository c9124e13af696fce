use super::HostConsole;
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

/// Keeps the host console raw for as long as it lives.
///
/// Cooked mode is restored on drop, which also covers early returns and
/// unwinding out of a panicking bridge loop.
pub struct RawConsoleGuard {
    console: Arc<dyn HostConsole>,
}

impl RawConsoleGuard {
    pub fn enter(console: Arc<dyn HostConsole>) -> io::Result<Self> {
        console.enable_raw()?;
        debug!("Host console switched to raw mode");
        Ok(Self { console })
    }
}

impl Drop for RawConsoleGuard {
    fn drop(&mut self) {
        match self.console.disable_raw() {
            Ok(()) => debug!("Host console restored to cooked mode"),
            Err(e) => warn!("Failed to restore cooked console mode: {}", e),
        }
    }
}
