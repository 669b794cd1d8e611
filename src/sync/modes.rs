//! Demodulation mode translation between the tuner and Hamlib mode tokens.

use std::collections::HashMap;

use crate::domain::{Mode, RigSyncError, RigSyncResult};

/// Single source of truth for local mode ↔ Hamlib token mapping.
/// Each entry is (local mode, rigctl token). Both columns are unique.
pub const MODE_TABLE: &[(Mode, &str)] = &[
    (Mode::Nfm, "FM"),
    (Mode::Wfm, "WFM"),
    (Mode::Am, "AM"),
    (Mode::Dsb, "DSB"),
    (Mode::Usb, "USB"),
    (Mode::Cw, "CW"),
    (Mode::Lsb, "LSB"),
];

/// Bidirectional lookup built once from [`MODE_TABLE`].
#[derive(Debug, Clone)]
pub struct ModeMap {
    to_remote: HashMap<Mode, &'static str>,
    to_local: HashMap<&'static str, Mode>,
}

impl ModeMap {
    pub fn new() -> Self {
        Self {
            to_remote: MODE_TABLE.iter().map(|&(mode, token)| (mode, token)).collect(),
            to_local: MODE_TABLE.iter().map(|&(mode, token)| (token, mode)).collect(),
        }
    }

    /// Hamlib token for a local mode.
    pub fn to_remote(&self, mode: Mode) -> RigSyncResult<&'static str> {
        self.to_remote.get(&mode).copied().ok_or_else(|| {
            RigSyncError::Translation(format!("Local mode {mode} has no rigctl equivalent"))
        })
    }

    /// Local mode for a Hamlib token.
    pub fn to_local(&self, token: &str) -> RigSyncResult<Mode> {
        self.to_local.get(token).copied().ok_or_else(|| {
            RigSyncError::Translation(format!("Rig mode '{token}' has no local equivalent"))
        })
    }
}

impl Default for ModeMap {
    fn default() -> Self {
        Self::new()
    }
}
