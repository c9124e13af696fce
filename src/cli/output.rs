use crate::domain::status::{StatusEvent, StatusReporter};
use std::io::{self, Write};
use std::sync::Mutex;

const TAG: &str = "[MT]";

/// Prints status lines to the host console.
///
/// Only called while the console is cooked, so plain `\n` line endings are fine.
pub struct ConsoleStatus<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleStatus<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleStatus<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Startup banner
    pub fn banner(&self, device: &str) {
        self.write_lines(&format!(
            "\nMiniterm {}\n\nProvided serial name {}\n",
            env!("CARGO_PKG_VERSION"),
            device
        ));
    }

    fn write_lines(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        // Status output must never take the bridge down.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

pub(crate) fn render(event: &StatusEvent) -> String {
    match event {
        StatusEvent::Waiting { .. } => format!("{} ⏳ {}\n", TAG, event),
        StatusEvent::Connected { .. } => format!("{} ✅ {}\n", TAG, event),
        StatusEvent::PermissionDenied { .. } => format!("{} 🚫 {}\n", TAG, event),
        StatusEvent::ConnectionLost | StatusEvent::Unexpected { .. } => {
            format!("\n{} ⚡ {}\n", TAG, event)
        }
        StatusEvent::Farewell => format!("\n{} {} 👋\n", TAG, event),
    }
}

impl<W: Write + Send> StatusReporter for ConsoleStatus<W> {
    fn report(&self, event: StatusEvent) {
        self.write_lines(&render(&event));
    }
}
