use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for Miniterm
#[derive(Parser, Debug)]
#[command(
    name = "miniterm",
    version = env!("CARGO_PKG_VERSION"),
    about = "Minimal serial console for embedded targets",
    long_about = "Bridges the host terminal to a serial device, waiting for the device to appear and reconnecting when it is unplugged and plugged back in. Press Ctrl-C to quit."
)]
pub struct Args {
    /// Serial device path, e.g. /dev/ttyUSB0
    pub device: String,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
