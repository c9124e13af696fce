//! Miniterm Library
//!
//! Serial console bridge: relays bytes between the host terminal and a
//! serial device, waiting for the device to appear and reconnecting after
//! it is unplugged.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::core::console::{ConsoleMode, HostConsole, HostInput, RawConsoleGuard, INTERRUPT_BYTE};
pub use crate::core::device::DeviceWatcher;
pub use crate::core::link::{LinkError, LinkOpener, LinkPort, OpenError, SerialLink};
pub use crate::core::session::{BridgeSession, SessionOutcome, SessionState};
pub use crate::core::{SessionSupervisor, SupervisorSettings};
pub use domain::config::MinitermConfig;
pub use domain::error::{MinitermError, MinitermResult};
pub use domain::status::{StatusEvent, StatusReporter};
