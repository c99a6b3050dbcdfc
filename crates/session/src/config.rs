use std::time::Duration;

use camera_sync::SyncConfig;

/// Quiet window before parameter edits are written to the address bar.
pub const URL_SYNC_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub url_debounce_ms: u64,
    pub sync: SyncConfig,
}

impl SessionConfig {
    pub fn url_debounce(&self) -> Duration {
        Duration::from_millis(self.url_debounce_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            url_debounce_ms: URL_SYNC_DEBOUNCE_MS,
            sync: SyncConfig::default(),
        }
    }
}
