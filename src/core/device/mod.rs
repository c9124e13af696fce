// Device module - Device presence detection
pub mod watcher;

pub use watcher::DeviceWatcher;
