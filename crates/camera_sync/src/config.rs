use std::time::Duration;

/// Quiet window before a side's camera report is committed.
pub const CAMERA_SYNC_DEBOUNCE_MS: u64 = 120;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub debounce_ms: u64,
}

impl SyncConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: CAMERA_SYNC_DEBOUNCE_MS,
        }
    }
}
