//! Local tuner port trait

use crate::domain::{Frequency, Mode, RigSyncResult, TuningMode};

/// The SDR host's display/tuner: display center, VFO offsets and demodulators.
pub trait LocalEndpoint: Send {
    /// Frequency at the center of the display
    fn center_frequency(&self) -> Frequency;

    /// Offset of a VFO from the display center, in Hz (0 for an unknown VFO)
    fn vfo_offset(&self, vfo: &str) -> f64;

    /// Tune a VFO to an absolute frequency
    fn tune(&mut self, mode: TuningMode, vfo: &str, target: Frequency);

    /// Current demodulation mode of a VFO
    fn mode(&self, vfo: &str) -> RigSyncResult<Mode>;

    /// Select a demodulation mode
    fn set_mode(&mut self, vfo: &str, mode: Mode) -> RigSyncResult<()>;

    /// Demodulator bandwidth of a VFO, in Hz
    fn bandwidth(&self, vfo: &str) -> f64;

    /// Set demodulator bandwidth, in Hz
    fn set_bandwidth(&mut self, vfo: &str, bandwidth: f64);
}
