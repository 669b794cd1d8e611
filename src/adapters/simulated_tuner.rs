//! Simulated SDR display/tuner.
//!
//! Stands in for the host application's waterfall: a display center, a
//! visible span, and named VFOs with an offset, demodulation mode and
//! bandwidth each. Used by the demo binary and by tests.
//!
//! Like `MockRadio`, clones share one tuner.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Frequency, Mode, RigSyncError, RigSyncResult, TuningMode};
use crate::ports::LocalEndpoint;

/// Default visible span (typical SDR sample rate), in Hz
const DEFAULT_SPAN_HZ: f64 = 2_400_000.0;

/// Normal tuning keeps the VFO at least this far (fraction of span) from the display edge
const EDGE_MARGIN: f64 = 0.05;

#[derive(Debug, Clone)]
struct Vfo {
    offset: f64,
    mode: Mode,
    bandwidth: f64,
}

impl Default for Vfo {
    fn default() -> Self {
        Self {
            offset: 0.0,
            mode: Mode::Usb,
            bandwidth: Mode::Usb.default_bandwidth(),
        }
    }
}

#[derive(Debug)]
struct TunerState {
    center: f64,
    span: f64,
    vfos: HashMap<String, Vfo>,
    tune_calls: Vec<(TuningMode, f64)>,
    locked_modes: Vec<Mode>,
}

#[derive(Debug, Clone)]
pub struct SimulatedTuner {
    state: Arc<Mutex<TunerState>>,
}

impl SimulatedTuner {
    /// A tuner centered on `center` with one VFO, `vfo`, sitting on the center.
    pub fn new(center: Frequency, vfo: &str) -> Self {
        let mut vfos = HashMap::new();
        vfos.insert(vfo.to_string(), Vfo::default());
        Self {
            state: Arc::new(Mutex::new(TunerState {
                center: center.as_hz(),
                span: DEFAULT_SPAN_HZ,
                vfos,
                tune_calls: Vec::new(),
                locked_modes: Vec::new(),
            })),
        }
    }

    /// Change the visible span (builder style).
    pub fn with_span(self, span_hz: f64) -> Self {
        self.state().span = span_hz;
        self
    }

    fn state(&self) -> MutexGuard<'_, TunerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Absolute frequency a VFO is listening on.
    pub fn vfo_frequency(&self, vfo: &str) -> Frequency {
        let state = self.state();
        let offset = state.vfos.get(vfo).map_or(0.0, |v| v.offset);
        Frequency::hz(state.center + offset)
    }

    /// Every tune request received, in order.
    pub fn tune_calls(&self) -> Vec<(TuningMode, f64)> {
        self.state().tune_calls.clone()
    }

    /// Make `set_mode` refuse a mode (e.g. the demodulator is missing).
    pub fn refuse_mode(&self, mode: Mode) {
        self.state().locked_modes.push(mode);
    }

    /// Play the operator clicking on the waterfall: moves the VFO without
    /// recording a tune request.
    pub fn click_tune(&self, vfo: &str, target: Frequency) {
        log::info!("[TUNER] {vfo} clicked to {target}");
        self.state().retune(TuningMode::Normal, vfo, target.as_hz());
    }
}

impl TunerState {
    fn retune(&mut self, mode: TuningMode, vfo: &str, target: f64) {
        let half_span = self.span / 2.0;
        let usable = half_span * (1.0 - 2.0 * EDGE_MARGIN);
        let center = self.center;
        let entry = self.vfos.entry(vfo.to_string()).or_default();
        match mode {
            TuningMode::Center => {
                self.center = target;
                entry.offset = 0.0;
            }
            TuningMode::Normal if (target - center).abs() <= usable => {
                entry.offset = target - center;
            }
            TuningMode::Normal => {
                // Out of view: scroll the display, keep the VFO where it sits on screen
                self.center = target - entry.offset;
            }
        }
    }
}

impl LocalEndpoint for SimulatedTuner {
    fn center_frequency(&self) -> Frequency {
        Frequency::hz(self.state().center)
    }

    fn vfo_offset(&self, vfo: &str) -> f64 {
        self.state().vfos.get(vfo).map_or(0.0, |v| v.offset)
    }

    fn tune(&mut self, mode: TuningMode, vfo: &str, target: Frequency) {
        log::info!("[TUNER] {vfo} tune {mode:?} → {target}");
        let mut state = self.state();
        state.tune_calls.push((mode, target.as_hz()));
        state.retune(mode, vfo, target.as_hz());
    }

    fn mode(&self, vfo: &str) -> RigSyncResult<Mode> {
        self.state()
            .vfos
            .get(vfo)
            .map(|v| v.mode)
            .ok_or_else(|| RigSyncError::Read(format!("No VFO named '{vfo}'")))
    }

    fn set_mode(&mut self, vfo: &str, mode: Mode) -> RigSyncResult<()> {
        let mut state = self.state();
        if state.locked_modes.contains(&mode) {
            return Err(RigSyncError::Write(format!("Demodulator {mode} unavailable")));
        }
        let entry = state
            .vfos
            .get_mut(vfo)
            .ok_or_else(|| RigSyncError::Write(format!("No VFO named '{vfo}'")))?;
        log::info!("[TUNER] {vfo} mode → {mode}");
        // Selecting a mode resets the bandwidth
        entry.mode = mode;
        entry.bandwidth = mode.default_bandwidth();
        Ok(())
    }

    fn bandwidth(&self, vfo: &str) -> f64 {
        self.state().vfos.get(vfo).map_or(0.0, |v| v.bandwidth)
    }

    fn set_bandwidth(&mut self, vfo: &str, bandwidth: f64) {
        log::info!("[TUNER] {vfo} bandwidth → {bandwidth} Hz");
        if let Some(entry) = self.state().vfos.get_mut(vfo) {
            entry.bandwidth = bandwidth;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_tune_inside_span_moves_only_the_vfo() {
        let mut tuner = SimulatedTuner::new(Frequency::hz(14_200_000.0), "Radio");
        tuner.tune(TuningMode::Normal, "Radio", Frequency::hz(14_250_000.0));
        assert_eq!(tuner.center_frequency().as_hz(), 14_200_000.0);
        assert_eq!(tuner.vfo_offset("Radio"), 50_000.0);
        assert_eq!(tuner.vfo_frequency("Radio").as_hz(), 14_250_000.0);
    }

    #[test]
    fn normal_tune_out_of_view_scrolls_the_display() {
        let mut tuner = SimulatedTuner::new(Frequency::hz(14_100_000.0), "Radio").with_span(200_000.0);
        tuner.tune(TuningMode::Normal, "Radio", Frequency::hz(14_050_000.0));
        assert_eq!(tuner.vfo_offset("Radio"), -50_000.0);

        tuner.tune(TuningMode::Normal, "Radio", Frequency::hz(14_250_000.0));
        assert_eq!(tuner.center_frequency().as_hz(), 14_300_000.0);
        assert_eq!(tuner.vfo_frequency("Radio").as_hz(), 14_250_000.0);
    }

    #[test]
    fn center_tune_recenters_on_target() {
        let mut tuner = SimulatedTuner::new(Frequency::hz(14_100_000.0), "Radio");
        tuner.click_tune("Radio", Frequency::hz(14_300_000.0));
        tuner.tune(TuningMode::Center, "Radio", Frequency::hz(14_250_000.0));
        assert_eq!(tuner.center_frequency().as_hz(), 14_250_000.0);
        assert_eq!(tuner.vfo_offset("Radio"), 0.0);
        assert_eq!(tuner.tune_calls(), vec![(TuningMode::Center, 14_250_000.0)]);
    }

    #[test]
    fn set_mode_resets_bandwidth() {
        let mut tuner = SimulatedTuner::new(Frequency::hz(7_100_000.0), "Radio");
        tuner.set_bandwidth("Radio", 1_800.0);
        tuner.set_mode("Radio", Mode::Am).unwrap();
        assert_eq!(tuner.mode("Radio").unwrap(), Mode::Am);
        assert_eq!(tuner.bandwidth("Radio"), 10_000.0);
    }

    #[test]
    fn unknown_vfo_and_refused_mode_are_errors() {
        let mut tuner = SimulatedTuner::new(Frequency::hz(7_100_000.0), "Radio");
        assert!(tuner.mode("Nope").is_err());
        assert_eq!(tuner.vfo_offset("Nope"), 0.0);
        tuner.refuse_mode(Mode::Cw);
        assert!(tuner.set_mode("Radio", Mode::Cw).is_err());
    }
}
