//! Reconciliation engine: the two one-directional sync passes.
//!
//! Each poll cycle runs `sync_local_with_remote` and then
//! `sync_remote_with_local`. Both passes follow the same recipe:
//!
//! 1. Read the side being observed and compare it with that side's mirror.
//!    A difference beyond [`FREQ_EPSILON`](crate::domain::FREQ_EPSILON)
//!    means that side changed; the mirror takes the new value.
//! 2. Compare the two mirrors. Only if they still differ is the other side
//!    written. A value this engine just pushed comes back equal to both
//!    mirrors, so it is never re-applied (echo suppression).
//! 3. A failed write leaves the mirror of the side that holds the wanted value
//!    untouched and marks the push pending; the opposite pass will not undo
//!    it unless its own side really changed, so the write is retried next cycle.
//!
//! The remote pass runs first, so when both sides move within one poll
//! period the radio wins.

use crate::domain::{approx_eq, Frequency, Mode, RigSyncError, RigSyncResult, SyncConfig, TuningMode};
use crate::ports::{LocalEndpoint, RemoteEndpoint};

use super::modes::ModeMap;

/// Last values the engine observed on each side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mirrors {
    pub remote_freq: Option<Frequency>,
    pub local_freq: Option<Frequency>,
    pub remote_mode: Option<String>,
    pub local_mode: Option<Mode>,
    pub remote_passband: Option<f64>,
    pub local_passband: Option<f64>,
    /// A local frequency change could not be written to the radio yet
    pub freq_to_remote_pending: bool,
    /// A local mode/bandwidth change could not be written to the radio yet
    pub mode_to_remote_pending: bool,
    /// A radio mode/passband change could not be applied to the tuner yet
    pub mode_to_local_pending: bool,
    /// The frequency mirrors disagree and that has already been logged at warn level
    pub mismatch_reported: bool,
}

/// `true` if `new` is a change relative to the mirrored `last` value.
fn freq_changed(last: Option<Frequency>, new: Frequency) -> bool {
    last.map_or(true, |last| !last.approx_eq(new))
}

/// Passbands cross rigctl as whole Hz, so they are compared at that resolution.
fn passband_changed(last: Option<f64>, new: f64) -> bool {
    last.map_or(true, |last| !approx_eq(last.round(), new.round()))
}

/// Runs the sync passes for one VFO.
#[derive(Debug, Clone)]
pub struct Reconciler {
    vfo: String,
    sync_mode: bool,
    modes: ModeMap,
}

impl Reconciler {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            vfo: config.vfo.clone(),
            sync_mode: config.sync_mode_enabled,
            modes: ModeMap::new(),
        }
    }

    /// Fresh reads of both sides, used to seed the mirrors on start.
    ///
    /// A failed frequency read is an error; a failed mode read only leaves
    /// that mirror unset.
    pub fn seed(
        &self,
        remote: &mut dyn RemoteEndpoint,
        local: &dyn LocalEndpoint,
    ) -> RigSyncResult<Mirrors> {
        let mut mirrors = Mirrors {
            remote_freq: Some(remote.get_frequency()?),
            local_freq: Some(self.local_frequency(local)),
            ..Mirrors::default()
        };

        if self.sync_mode {
            match remote.get_mode() {
                Ok((token, passband)) => {
                    mirrors.remote_mode = Some(token);
                    mirrors.remote_passband = Some(passband);
                }
                Err(e) => log::warn!("Could not read rig mode: {e}"),
            }
            match local.mode(&self.vfo) {
                Ok(mode) => {
                    mirrors.local_mode = Some(mode);
                    mirrors.local_passband = Some(local.bandwidth(&self.vfo));
                }
                Err(e) => log::warn!("Could not read {} mode: {e}", self.vfo),
            }
        }

        Ok(mirrors)
    }

    /// Run both passes, remote→local first. Returns the errors of the passes that failed.
    pub fn run_cycle(
        &self,
        mirrors: &mut Mirrors,
        remote: &mut dyn RemoteEndpoint,
        local: &mut dyn LocalEndpoint,
    ) -> Vec<RigSyncError> {
        let mut failures = Vec::new();
        if let Err(e) = self.sync_local_with_remote(mirrors, remote, local) {
            log::error!("Rig → tuner sync failed: {e}");
            failures.push(e);
        }
        if let Err(e) = self.sync_remote_with_local(mirrors, remote, local) {
            log::error!("Tuner → rig sync failed: {e}");
            failures.push(e);
        }
        failures
    }

    /// Remote→local pass: follow the radio.
    pub fn sync_local_with_remote(
        &self,
        mirrors: &mut Mirrors,
        remote: &mut dyn RemoteEndpoint,
        local: &mut dyn LocalEndpoint,
    ) -> RigSyncResult<()> {
        let new_freq = remote.get_frequency()?;
        let remote_changed = freq_changed(mirrors.remote_freq, new_freq);
        if remote_changed {
            log::debug!("Rig frequency changed to {new_freq}");
            mirrors.remote_freq = Some(new_freq);
            mirrors.freq_to_remote_pending = false;
        }

        let target = mirrors.remote_freq.unwrap_or(new_freq);
        let hold_for_retry = !remote_changed && mirrors.freq_to_remote_pending;
        if !hold_for_retry && freq_changed(mirrors.local_freq, target) {
            log::info!("Rig → tuner: {target}");
            self.tune_local(local, target);
            mirrors.local_freq = Some(target);
        }

        self.check_consistency(mirrors);

        if self.sync_mode {
            self.sync_local_mode_with_remote(mirrors, remote, local)?;
        }
        Ok(())
    }

    /// Local→remote pass: follow the tuner.
    pub fn sync_remote_with_local(
        &self,
        mirrors: &mut Mirrors,
        remote: &mut dyn RemoteEndpoint,
        local: &mut dyn LocalEndpoint,
    ) -> RigSyncResult<()> {
        let new_freq = self.local_frequency(local);
        if freq_changed(mirrors.local_freq, new_freq) {
            log::debug!("Tuner frequency changed to {new_freq}");
            mirrors.local_freq = Some(new_freq);
        }

        let target = mirrors.local_freq.unwrap_or(new_freq);
        if freq_changed(mirrors.remote_freq, target) {
            log::info!("Tuner → rig: {target}");
            if let Err(e) = remote.set_frequency(target) {
                mirrors.freq_to_remote_pending = true;
                return Err(e);
            }
            mirrors.remote_freq = Some(target);
            mirrors.freq_to_remote_pending = false;
        }

        if self.sync_mode {
            self.sync_remote_mode_with_local(mirrors, remote, local)?;
        }
        Ok(())
    }

    /// Exact post-sync comparison of the frequency mirrors. A lasting mismatch
    /// is reported at warn level once, then at debug until the mirrors agree again.
    fn check_consistency(&self, mirrors: &mut Mirrors) {
        if mirrors.freq_to_remote_pending || mirrors.remote_freq == mirrors.local_freq {
            mirrors.mismatch_reported = false;
            return;
        }
        let (rig, tuner) = (mirrors.remote_freq, mirrors.local_freq);
        if mirrors.mismatch_reported {
            log::debug!("Mirrors still disagree: rig {rig:?}, tuner {tuner:?}");
        } else {
            log::warn!("Mirrors disagree after sync: rig {rig:?}, tuner {tuner:?}");
            mirrors.mismatch_reported = true;
        }
    }

    /// Absolute frequency of the synced VFO: display center plus VFO offset.
    fn local_frequency(&self, local: &dyn LocalEndpoint) -> Frequency {
        Frequency::hz(local.center_frequency().as_hz() + local.vfo_offset(&self.vfo))
    }

    /// Tune the VFO; if that scrolled the display (e.g. a band change), re-center on the target.
    fn tune_local(&self, local: &mut dyn LocalEndpoint, target: Frequency) {
        let before = local.center_frequency();
        local.tune(TuningMode::Normal, &self.vfo, target);
        let after = local.center_frequency();
        if !before.approx_eq(after) {
            log::debug!("Display center moved {before} → {after}; re-centering on {target}");
            local.tune(TuningMode::Center, &self.vfo, target);
        }
    }

    fn sync_local_mode_with_remote(
        &self,
        mirrors: &mut Mirrors,
        remote: &mut dyn RemoteEndpoint,
        local: &mut dyn LocalEndpoint,
    ) -> RigSyncResult<()> {
        let (token, passband) = remote.get_mode()?;
        let remote_changed = mirrors.remote_mode.as_deref() != Some(token.as_str())
            || passband_changed(mirrors.remote_passband, passband);
        if remote_changed {
            log::debug!("Rig mode changed to {token} ({passband} Hz)");
            mirrors.remote_mode = Some(token.clone());
            mirrors.remote_passband = Some(passband);
            mirrors.mode_to_remote_pending = false;
        } else if mirrors.mode_to_remote_pending || self.local_mode_untranslatable(mirrors) {
            return Ok(());
        }

        let mode = match self.modes.to_local(&token) {
            Ok(mode) => mode,
            Err(e) => {
                if remote_changed {
                    log::warn!("{e}; mode not synced");
                }
                return Ok(());
            }
        };
        // rigctl reports 0 for "the mode's normal passband"
        let bandwidth = if passband > 0.0 { passband } else { mode.default_bandwidth() };

        let mode_differs = mirrors.local_mode != Some(mode);
        if !mode_differs && !passband_changed(mirrors.local_passband, bandwidth) {
            return Ok(());
        }

        log::info!("Rig → tuner: {mode}, {bandwidth} Hz");
        if mode_differs {
            if let Err(e) = local.set_mode(&self.vfo, mode) {
                mirrors.mode_to_local_pending = true;
                return Err(e);
            }
            mirrors.local_mode = Some(mode);
        }
        // Selecting a mode resets the bandwidth, so it is always applied after
        local.set_bandwidth(&self.vfo, bandwidth);
        mirrors.local_passband = Some(bandwidth);
        mirrors.mode_to_local_pending = false;
        Ok(())
    }

    fn sync_remote_mode_with_local(
        &self,
        mirrors: &mut Mirrors,
        remote: &mut dyn RemoteEndpoint,
        local: &mut dyn LocalEndpoint,
    ) -> RigSyncResult<()> {
        let mode = local.mode(&self.vfo)?;
        let bandwidth = local.bandwidth(&self.vfo);
        let local_changed =
            mirrors.local_mode != Some(mode) || passband_changed(mirrors.local_passband, bandwidth);
        if local_changed {
            log::debug!("Tuner mode changed to {mode} ({bandwidth} Hz)");
            mirrors.local_mode = Some(mode);
            mirrors.local_passband = Some(bandwidth);
            mirrors.mode_to_local_pending = false;
        } else if mirrors.mode_to_local_pending || self.remote_mode_untranslatable(mirrors) {
            return Ok(());
        }

        let token = match self.modes.to_remote(mode) {
            Ok(token) => token,
            Err(e) => {
                if local_changed {
                    log::warn!("{e}; mode not synced");
                }
                return Ok(());
            }
        };

        let remote_bandwidth = mirrors
            .remote_passband
            .map(|pb| if pb > 0.0 { pb } else { mode.default_bandwidth() });
        if mirrors.remote_mode.as_deref() == Some(token)
            && !passband_changed(remote_bandwidth, bandwidth)
        {
            return Ok(());
        }

        log::info!("Tuner → rig: {token}, {bandwidth} Hz");
        if let Err(e) = remote.set_mode(token, bandwidth) {
            mirrors.mode_to_remote_pending = true;
            return Err(e);
        }
        mirrors.remote_mode = Some(token.to_string());
        mirrors.remote_passband = Some(bandwidth);
        mirrors.mode_to_remote_pending = false;
        Ok(())
    }

    /// The tuner sits in a mode the rig cannot express; leave the tuner alone until the rig changes.
    fn local_mode_untranslatable(&self, mirrors: &Mirrors) -> bool {
        mirrors
            .local_mode
            .is_some_and(|mode| self.modes.to_remote(mode).is_err())
    }

    /// The rig sits in a mode the tuner cannot express; leave the rig alone until the tuner changes.
    fn remote_mode_untranslatable(&self, mirrors: &Mirrors) -> bool {
        mirrors
            .remote_mode
            .as_deref()
            .is_some_and(|token| self.modes.to_local(token).is_err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockRadio, SimulatedTuner};

    const VFO: &str = "Radio";

    struct Rig {
        reconciler: Reconciler,
        mirrors: Mirrors,
        radio: MockRadio,
        tuner: SimulatedTuner,
    }

    impl Rig {
        fn new(remote_hz: f64, tuner: SimulatedTuner, sync_mode: bool) -> Self {
            let config = SyncConfig {
                sync_mode_enabled: sync_mode,
                ..SyncConfig::default()
            };
            let reconciler = Reconciler::new(&config);
            let radio = MockRadio::with_frequency(Frequency::hz(remote_hz));
            let mirrors = reconciler.seed(&mut radio.clone(), &tuner).unwrap();
            Self { reconciler, mirrors, radio, tuner }
        }

        fn in_sync(hz: f64) -> Self {
            Self::new(hz, SimulatedTuner::new(Frequency::hz(hz), VFO), false)
        }

        fn cycle(&mut self) -> Vec<RigSyncError> {
            let mut radio = self.radio.clone();
            let mut tuner = self.tuner.clone();
            self.reconciler.run_cycle(&mut self.mirrors, &mut radio, &mut tuner)
        }

        fn assert_mirrors(&self, hz: f64) {
            assert_eq!(self.mirrors.remote_freq, Some(Frequency::hz(hz)));
            assert_eq!(self.mirrors.local_freq, Some(Frequency::hz(hz)));
        }
    }

    // --- Frequency ---

    #[test]
    fn idle_cycle_when_sides_agree_writes_nothing() {
        let mut rig = Rig::in_sync(14_200_000.0);
        for _ in 0..3 {
            assert!(rig.cycle().is_empty());
        }
        assert!(rig.radio.frequency_writes().is_empty());
        assert!(rig.tuner.tune_calls().is_empty());
    }

    #[test]
    fn sub_epsilon_drift_is_not_a_change() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.turn_dial(Frequency::hz(14_200_000.0005));
        assert!(rig.cycle().is_empty());
        assert!(rig.tuner.tune_calls().is_empty());
        assert!(rig.radio.frequency_writes().is_empty());
    }

    #[test]
    fn rig_dial_change_tunes_tuner_without_writing_back() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.turn_dial(Frequency::hz(14_250_000.0));

        assert!(rig.cycle().is_empty());

        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 14_250_000.0);
        assert!(rig.radio.frequency_writes().is_empty());
        rig.assert_mirrors(14_250_000.0);
    }

    #[test]
    fn differing_sides_converge_on_rig_in_one_cycle() {
        let tuner = SimulatedTuner::new(Frequency::hz(7_100_000.0), VFO);
        let mut rig = Rig::new(14_200_000.0, tuner, false);
        assert_ne!(rig.mirrors.remote_freq, rig.mirrors.local_freq);

        assert!(rig.cycle().is_empty());

        rig.assert_mirrors(14_200_000.0);
        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 14_200_000.0);
        assert!(rig.radio.frequency_writes().is_empty());
    }

    #[test]
    fn simultaneous_changes_resolve_in_favour_of_rig() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.turn_dial(Frequency::hz(14_230_000.0));
        rig.tuner.click_tune(VFO, Frequency::hz(14_180_000.0));

        assert!(rig.cycle().is_empty());

        rig.assert_mirrors(14_230_000.0);
        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 14_230_000.0);
        assert!(rig.radio.frequency_writes().is_empty());
    }

    #[test]
    fn tuner_change_is_written_to_rig() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.tuner.click_tune(VFO, Frequency::hz(14_210_000.0));

        assert!(rig.cycle().is_empty());

        assert_eq!(rig.radio.frequency_writes(), vec![14_210_000.0]);
        assert!(rig.tuner.tune_calls().is_empty());
        rig.assert_mirrors(14_210_000.0);
    }

    #[test]
    fn value_pushed_to_rig_is_not_echoed_back() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.tuner.click_tune(VFO, Frequency::hz(14_210_000.0));
        rig.cycle();

        // The rig now reports the pushed value; nothing may bounce back
        assert_eq!(rig.radio.frequency().as_hz(), 14_210_000.0);
        assert!(rig.cycle().is_empty());
        assert!(rig.tuner.tune_calls().is_empty());
        assert_eq!(rig.radio.frequency_writes().len(), 1);
    }

    #[test]
    fn band_change_recenters_display() {
        let tuner = SimulatedTuner::new(Frequency::hz(14_100_000.0), VFO).with_span(200_000.0);
        tuner.click_tune(VFO, Frequency::hz(14_050_000.0));
        let mut rig = Rig::new(14_050_000.0, tuner, false);

        rig.radio.turn_dial(Frequency::hz(14_250_000.0));
        assert!(rig.cycle().is_empty());

        assert_eq!(
            rig.tuner.tune_calls(),
            vec![
                (TuningMode::Normal, 14_250_000.0),
                (TuningMode::Center, 14_250_000.0),
            ]
        );
        assert_eq!(rig.tuner.center_frequency().as_hz(), 14_250_000.0);
        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 14_250_000.0);
        assert!(rig.radio.frequency_writes().is_empty());
    }

    #[test]
    fn in_view_tune_does_not_recenter() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.turn_dial(Frequency::hz(14_250_000.0));
        rig.cycle();
        assert_eq!(
            rig.tuner.tune_calls(),
            vec![(TuningMode::Normal, 14_250_000.0)]
        );
    }

    #[test]
    fn sub_epsilon_mismatch_is_reported_once_until_mirrors_agree() {
        let tuner = SimulatedTuner::new(Frequency::hz(14_200_000.0005), VFO);
        let mut rig = Rig::new(14_200_000.0, tuner, false);

        assert!(rig.cycle().is_empty());
        assert!(rig.mirrors.mismatch_reported);
        assert!(rig.cycle().is_empty());
        assert!(rig.mirrors.mismatch_reported);
        assert!(rig.tuner.tune_calls().is_empty());

        rig.radio.turn_dial(Frequency::hz(14_250_000.0));
        assert!(rig.cycle().is_empty());
        assert!(!rig.mirrors.mismatch_reported);
        rig.assert_mirrors(14_250_000.0);
    }

    #[test]
    fn fractional_tuner_frequency_is_not_echoed_back() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.tuner.click_tune(VFO, Frequency::hz(14_230_000.4));
        assert!(rig.cycle().is_empty());

        for _ in 0..3 {
            assert!(rig.cycle().is_empty());
        }
        assert_eq!(rig.radio.frequency_writes().len(), 1);
        assert!(rig.tuner.tune_calls().is_empty());
        assert!(!rig.mirrors.mismatch_reported);
    }

    // --- Failures ---

    #[test]
    fn rig_read_failure_keeps_previous_mirror_and_local_pass_still_runs() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.set_fail_reads(true);
        rig.tuner.click_tune(VFO, Frequency::hz(14_220_000.0));

        let failures = rig.cycle();

        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], RigSyncError::Read(_)));
        assert_eq!(rig.radio.frequency_writes(), vec![14_220_000.0]);
        rig.assert_mirrors(14_220_000.0);
    }

    #[test]
    fn rig_write_failure_keeps_tuner_value_and_retries() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.set_fail_writes(true);
        rig.tuner.click_tune(VFO, Frequency::hz(14_220_000.0));

        assert_eq!(rig.cycle().len(), 1);
        assert_eq!(rig.mirrors.local_freq, Some(Frequency::hz(14_220_000.0)));
        assert_eq!(rig.mirrors.remote_freq, Some(Frequency::hz(14_200_000.0)));
        assert!(rig.mirrors.freq_to_remote_pending);

        // Still failing: the tuner must not be dragged back to the rig's value
        assert_eq!(rig.cycle().len(), 1);
        assert!(rig.tuner.tune_calls().is_empty());
        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 14_220_000.0);

        rig.radio.set_fail_writes(false);
        assert!(rig.cycle().is_empty());
        assert_eq!(rig.radio.frequency().as_hz(), 14_220_000.0);
        assert!(!rig.mirrors.freq_to_remote_pending);
        rig.assert_mirrors(14_220_000.0);
    }

    #[test]
    fn rig_change_overrides_pending_tuner_write() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.set_fail_writes(true);
        rig.tuner.click_tune(VFO, Frequency::hz(14_220_000.0));
        rig.cycle();

        rig.radio.turn_dial(Frequency::hz(7_074_000.0));
        rig.radio.set_fail_writes(false);
        assert!(rig.cycle().is_empty());

        assert_eq!(rig.tuner.vfo_frequency(VFO).as_hz(), 7_074_000.0);
        rig.assert_mirrors(7_074_000.0);
        assert!(rig.radio.frequency_writes().is_empty());
    }

    // --- Mode and passband ---

    fn mode_rig() -> Rig {
        Rig::new(14_200_000.0, SimulatedTuner::new(Frequency::hz(14_200_000.0), VFO), true)
    }

    #[test]
    fn seed_reads_modes_when_enabled() {
        let rig = mode_rig();
        assert_eq!(rig.mirrors.remote_mode.as_deref(), Some("USB"));
        assert_eq!(rig.mirrors.remote_passband, Some(2_400.0));
        assert_eq!(rig.mirrors.local_mode, Some(Mode::Usb));
        assert_eq!(rig.mirrors.local_passband, Some(2_800.0));
    }

    #[test]
    fn first_cycle_aligns_tuner_bandwidth_with_rig() {
        let mut rig = mode_rig();
        assert!(rig.cycle().is_empty());
        assert_eq!(rig.tuner.bandwidth(VFO), 2_400.0);
        assert!(rig.radio.mode_writes().is_empty());

        // Settled: a further cycle writes nothing
        assert!(rig.cycle().is_empty());
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn rig_mode_change_is_applied_to_tuner() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.radio.select_mode("AM", 6_000.0);

        assert!(rig.cycle().is_empty());

        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Am);
        assert_eq!(rig.tuner.bandwidth(VFO), 6_000.0);
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn rig_default_passband_uses_mode_default_bandwidth() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.radio.select_mode("FM", 0.0);
        rig.cycle();
        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Nfm);
        assert_eq!(rig.tuner.bandwidth(VFO), 12_500.0);
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn tuner_mode_change_is_written_to_rig() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.tuner.clone().set_mode(VFO, Mode::Lsb).unwrap();

        assert!(rig.cycle().is_empty());

        assert_eq!(rig.radio.mode_writes(), vec![("LSB".to_string(), 2_800.0)]);
        assert_eq!(rig.radio.mode(), ("LSB".to_string(), 2_800.0));

        // Echo of the pushed mode is suppressed
        assert!(rig.cycle().is_empty());
        assert_eq!(rig.radio.mode_writes().len(), 1);
        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Lsb);
    }

    #[test]
    fn untranslatable_rig_mode_is_skipped_not_failed() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.radio.select_mode("PKTUSB", 3_000.0);

        for _ in 0..3 {
            assert!(rig.cycle().is_empty());
        }
        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Usb);
        assert_eq!(rig.radio.mode(), ("PKTUSB".to_string(), 3_000.0));
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn untranslatable_tuner_mode_is_skipped_not_failed() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.tuner.clone().set_mode(VFO, Mode::Raw).unwrap();

        for _ in 0..3 {
            assert!(rig.cycle().is_empty());
        }
        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Raw);
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn refused_tuner_mode_fails_pass_without_reverting_rig() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.tuner.refuse_mode(Mode::Am);
        rig.radio.select_mode("AM", 6_000.0);

        for _ in 0..2 {
            let failures = rig.cycle();
            assert_eq!(failures.len(), 1);
            assert!(matches!(failures[0], RigSyncError::Write(_)));
        }
        assert_eq!(rig.radio.mode(), ("AM".to_string(), 6_000.0));
        assert!(rig.radio.mode_writes().is_empty());
    }

    #[test]
    fn fractional_tuner_bandwidth_settles_at_whole_hertz() {
        let mut rig = mode_rig();
        rig.cycle();
        rig.tuner.clone().set_bandwidth(VFO, 2_700.5);

        assert!(rig.cycle().is_empty());
        assert_eq!(rig.radio.mode_writes(), vec![("USB".to_string(), 2_700.5)]);

        // The rig reports the whole-Hz passband it accepted; that is not a new change
        rig.radio.select_mode("USB", 2_701.0);
        for _ in 0..3 {
            assert!(rig.cycle().is_empty());
        }
        assert_eq!(rig.tuner.bandwidth(VFO), 2_700.5);
        assert_eq!(rig.radio.mode_writes().len(), 1);
    }

    #[test]
    fn mode_sync_disabled_ignores_modes() {
        let mut rig = Rig::in_sync(14_200_000.0);
        rig.radio.select_mode("AM", 6_000.0);
        assert!(rig.cycle().is_empty());
        assert_eq!(rig.tuner.mode(VFO).unwrap(), Mode::Usb);
        assert_eq!(rig.mirrors.remote_mode, None);
    }
}
