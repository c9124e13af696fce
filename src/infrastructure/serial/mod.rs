// Serial module - serialport-backed links
pub mod port;

pub use port::SerialPortOpener;
