// Link module - Serial link ownership and byte I/O
pub mod error;
pub mod serial_link;

pub use error::{LinkError, OpenError};
pub use serial_link::{LinkOpener, LinkPort, LinkReader, LinkWriter, SerialLink};
