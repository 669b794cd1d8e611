//! Core domain types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RigSyncError, RigSyncResult};

/// Half-width used for every floating comparison (frequency and passband), in Hz
pub const FREQ_EPSILON: f64 = 1e-3;

/// `true` when `a` and `b` are within [`FREQ_EPSILON`] of each other
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= FREQ_EPSILON
}

/// Frequency in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(pub f64);

impl Frequency {
    pub fn hz(hz: f64) -> Self {
        Self(hz)
    }

    pub fn khz(khz: f64) -> Self {
        Self(khz * 1_000.0)
    }

    pub fn mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    pub fn as_hz(&self) -> f64 {
        self.0
    }

    /// Equality within [`FREQ_EPSILON`]
    pub fn approx_eq(&self, other: Frequency) -> bool {
        approx_eq(self.0, other.0)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} MHz", self.0 / 1e6)
    }
}

/// Demodulation mode of a local VFO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Nfm,
    Wfm,
    Am,
    Dsb,
    Usb,
    Cw,
    Lsb,
    Raw,
}

impl Mode {
    pub const ALL: [Mode; 8] = [
        Mode::Nfm,
        Mode::Wfm,
        Mode::Am,
        Mode::Dsb,
        Mode::Usb,
        Mode::Cw,
        Mode::Lsb,
        Mode::Raw,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Nfm => "NFM",
            Mode::Wfm => "WFM",
            Mode::Am => "AM",
            Mode::Dsb => "DSB",
            Mode::Usb => "USB",
            Mode::Cw => "CW",
            Mode::Lsb => "LSB",
            Mode::Raw => "RAW",
        }
    }

    /// Bandwidth the demodulator falls back to when this mode is selected, in Hz
    pub fn default_bandwidth(&self) -> f64 {
        match self {
            Mode::Nfm => 12_500.0,
            Mode::Wfm => 150_000.0,
            Mode::Am => 10_000.0,
            Mode::Dsb => 4_600.0,
            Mode::Usb | Mode::Lsb => 2_800.0,
            Mode::Cw => 500.0,
            Mode::Raw => 48_000.0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = RigSyncError;

    fn from_str(s: &str) -> RigSyncResult<Self> {
        let wanted = s.trim();
        Mode::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RigSyncError::Config(format!("Unknown demodulation mode: '{s}'")))
    }
}

/// How a local tune request positions the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuningMode {
    /// Move the VFO; the display only scrolls if the target is out of view
    Normal,
    /// Re-center the display on the target
    Center,
}

/// Lifecycle of a sync session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Idle,
    Running,
    Stopping,
}

/// What the status indicator shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncStatus {
    Idle,
    Connected,
    Disconnected,
}
