//! Sync configuration profiles
//!
//! A SyncConfig is a saved profile describing where the rigctl server lives
//! and how the sync session behaves. Every field has a serde default so an
//! older or hand-edited profile with missing keys still loads.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{RigSyncError, RigSyncResult};

/// A saved sync profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Profile name (e.g., "Default", "IC-7300 Shack")
    pub name: String,
    /// rigctld host
    pub host: String,
    /// rigctld TCP port
    pub port: u16,
    /// Delay between poll cycles
    pub poll_period_ms: u64,
    /// Mirror demodulation mode and passband as well as frequency
    pub sync_mode_enabled: bool,
    /// Consecutive failed cycles tolerated before the session stops itself
    pub max_consecutive_errors: u32,
    /// Local VFO kept in step with the radio
    pub vfo: String,
}

impl SyncConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> RigSyncResult<()> {
        if self.host.trim().is_empty() {
            return Err(RigSyncError::Config("Host cannot be empty".into()));
        }
        if self.port == 0 {
            return Err(RigSyncError::Config("Port must be between 1 and 65535".into()));
        }
        if self.poll_period_ms == 0 {
            return Err(RigSyncError::Config("Poll period must be greater than zero".into()));
        }
        if self.vfo.trim().is_empty() {
            return Err(RigSyncError::Config("VFO name cannot be empty".into()));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            host: "127.0.0.1".to_string(),
            port: 4532,
            poll_period_ms: 250,
            sync_mode_enabled: false,
            max_consecutive_errors: 16,
            vfo: "Radio".to_string(),
        }
    }
}
