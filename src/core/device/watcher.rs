use crate::domain::status::{StatusEvent, StatusReporter};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Waits for the device node to show up
pub struct DeviceWatcher {
    interval: Duration,
    status: Arc<dyn StatusReporter>,
}

impl DeviceWatcher {
    pub fn new(interval: Duration, status: Arc<dyn StatusReporter>) -> Self {
        Self { interval, status }
    }

    pub fn is_present(path: &str) -> bool {
        Path::new(path).exists()
    }

    /// Block until `path` exists. Never times out; callers race it against
    /// shutdown if they need to bail out.
    pub async fn wait_until_present(&self, path: &str) {
        if Self::is_present(path) {
            return;
        }

        info!("Waiting for device {}", path);
        self.status.report(StatusEvent::Waiting {
            path: path.to_string(),
        });

        loop {
            tokio::time::sleep(self.interval).await;
            if Self::is_present(path) {
                break;
            }
        }

        debug!("Device {} appeared", path);
    }
}
