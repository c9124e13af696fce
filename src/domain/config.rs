use crate::domain::error::{MinitermError, MinitermResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Baud rate used when no configuration overrides it
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Miniterm configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MinitermConfig {
    /// Serial link settings
    #[serde(default)]
    pub serial: SerialConfig,
    /// Device presence polling
    #[serde(default)]
    pub watch: WatchConfig,
    /// Host keyboard polling
    #[serde(default)]
    pub input: InputConfig,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Fixed baud rate, never negotiated with the target
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Read wake-up interval in milliseconds
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
}

/// Device watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Interval between existence checks in milliseconds
    #[serde(default = "default_watch_interval")]
    pub poll_interval_ms: u64,
}

/// Host input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Keyboard poll interval in milliseconds
    #[serde(default = "default_input_poll")]
    pub poll_interval_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default log level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; stderr when unset
    #[serde(default)]
    pub file: Option<PathBuf>,
}

// Default value functions
fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_read_timeout() -> u64 {
    50
}

fn default_watch_interval() -> u64 {
    1000
}

fn default_input_poll() -> u64 {
    50
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_watch_interval(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_input_poll(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl MinitermConfig {
    /// Reject values that would stall or spin the relays
    pub fn validate(&self) -> MinitermResult<()> {
        let required = [
            ("serial.baud_rate", u64::from(self.serial.baud_rate)),
            ("serial.read_timeout_ms", self.serial.read_timeout_ms),
            ("watch.poll_interval_ms", self.watch.poll_interval_ms),
            ("input.poll_interval_ms", self.input.poll_interval_ms),
        ];

        match required.iter().find(|(_, value)| *value == 0) {
            Some((key, _)) => Err(MinitermError::Config {
                message: format!("{} must be greater than zero", key),
            }),
            None => Ok(()),
        }
    }
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl InputConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
