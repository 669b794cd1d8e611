//! Mock radio adapter for development and testing without hardware.
//!
//! Activate by setting MOCK_RADIO=1 in the environment:
//!
//!   MOCK_RADIO=1 RUST_LOG=rigsync_lib=info cargo run
//!
//! Every RemoteEndpoint call is logged at INFO level so you can verify
//! exactly what the sync engine would send to a real rigctld.
//!
//! `MockRadio` is a cheap handle: clones share one radio, so a test (or the
//! demo binary) can keep a handle, play the operator turning the knob, and
//! inspect what the session wrote.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{Frequency, RigSyncError, RigSyncResult};
use crate::ports::{RemoteConnector, RemoteEndpoint};

/// Default frequency: 20m SSB
const DEFAULT_FREQ_HZ: f64 = 14_200_000.0;
/// Default mode and passband
const DEFAULT_MODE: &str = "USB";
const DEFAULT_PASSBAND_HZ: f64 = 2_400.0;

#[derive(Debug)]
struct MockRadioState {
    frequency: f64,
    mode: String,
    passband: f64,
    open: bool,
    fail_reads: bool,
    fail_writes: bool,
    frequency_writes: Vec<f64>,
    mode_writes: Vec<(String, f64)>,
    close_count: usize,
}

#[derive(Debug, Clone)]
pub struct MockRadio {
    state: Arc<Mutex<MockRadioState>>,
}

impl MockRadio {
    pub fn new() -> Self {
        Self::with_frequency(Frequency::hz(DEFAULT_FREQ_HZ))
    }

    pub fn with_frequency(freq: Frequency) -> Self {
        log::info!("[MOCK RADIO] Initialized at {freq}, mode={DEFAULT_MODE}");
        Self {
            state: Arc::new(Mutex::new(MockRadioState {
                frequency: freq.as_hz(),
                mode: DEFAULT_MODE.to_string(),
                passband: DEFAULT_PASSBAND_HZ,
                open: true,
                fail_reads: false,
                fail_writes: false,
                frequency_writes: Vec::new(),
                mode_writes: Vec::new(),
                close_count: 0,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockRadioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Operator side: change the radio behind the session's back ---

    pub fn turn_dial(&self, freq: Frequency) {
        log::info!("[MOCK RADIO] Dial turned to {freq}");
        self.state().frequency = freq.as_hz();
    }

    pub fn select_mode(&self, mode: &str, passband: f64) {
        log::info!("[MOCK RADIO] Mode switched to {mode} ({passband} Hz)");
        let mut state = self.state();
        state.mode = mode.to_string();
        state.passband = passband;
    }

    /// Make every subsequent read fail until cleared.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state().fail_reads = fail;
    }

    /// Make every subsequent write fail until cleared.
    pub fn set_fail_writes(&self, fail: bool) {
        self.state().fail_writes = fail;
    }

    /// Simulate the link dropping without anyone calling `close`.
    pub fn drop_link(&self) {
        log::info!("[MOCK RADIO] Link dropped");
        self.state().open = false;
    }

    // --- Inspection ---

    pub fn frequency(&self) -> Frequency {
        Frequency::hz(self.state().frequency)
    }

    pub fn mode(&self) -> (String, f64) {
        let state = self.state();
        (state.mode.clone(), state.passband)
    }

    pub fn frequency_writes(&self) -> Vec<f64> {
        self.state().frequency_writes.clone()
    }

    pub fn mode_writes(&self) -> Vec<(String, f64)> {
        self.state().mode_writes.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state().close_count
    }
}

impl Default for MockRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteEndpoint for MockRadio {
    fn get_frequency(&mut self) -> RigSyncResult<Frequency> {
        let state = self.state();
        if state.fail_reads {
            log::info!("[MOCK RADIO] GET FREQ → f → RPRT -5");
            return Err(RigSyncError::Read("mock radio read failure".into()));
        }
        log::info!("[MOCK RADIO] GET FREQ → f → {:.0}", state.frequency);
        Ok(Frequency::hz(state.frequency))
    }

    fn set_frequency(&mut self, freq: Frequency) -> RigSyncResult<()> {
        let mut state = self.state();
        if state.fail_writes {
            log::info!("[MOCK RADIO] SET FREQ → F {:.0} → RPRT -9", freq.as_hz());
            return Err(RigSyncError::Write("mock radio write failure".into()));
        }
        log::info!("[MOCK RADIO] SET FREQ → F {:.0}  ({freq})", freq.as_hz());
        state.frequency = freq.as_hz();
        state.frequency_writes.push(freq.as_hz());
        Ok(())
    }

    fn get_mode(&mut self) -> RigSyncResult<(String, f64)> {
        let state = self.state();
        if state.fail_reads {
            log::info!("[MOCK RADIO] GET MODE → m → RPRT -5");
            return Err(RigSyncError::Read("mock radio read failure".into()));
        }
        log::info!("[MOCK RADIO] GET MODE → m → {} {}", state.mode, state.passband);
        Ok((state.mode.clone(), state.passband))
    }

    fn set_mode(&mut self, mode: &str, passband: f64) -> RigSyncResult<()> {
        let mut state = self.state();
        if state.fail_writes {
            log::info!("[MOCK RADIO] SET MODE → M {mode} {passband} → RPRT -9");
            return Err(RigSyncError::Write("mock radio write failure".into()));
        }
        log::info!("[MOCK RADIO] SET MODE → M {mode} {passband}");
        state.mode = mode.to_string();
        state.passband = passband;
        state.mode_writes.push((mode.to_string(), passband));
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state().open
    }

    fn close(&mut self) {
        log::info!("[MOCK RADIO] CLOSE → q");
        let mut state = self.state();
        state.open = false;
        state.close_count += 1;
    }
}

/// Hands out the same `MockRadio` on every connect, reopening its link.
#[derive(Debug, Clone)]
pub struct MockConnector {
    radio: MockRadio,
    refuse: Arc<Mutex<bool>>,
}

impl MockConnector {
    pub fn new(radio: MockRadio) -> Self {
        Self {
            radio,
            refuse: Arc::new(Mutex::new(false)),
        }
    }

    /// Make subsequent connects fail (rigctld not running).
    pub fn set_refuse(&self, refuse: bool) {
        *self.refuse.lock().unwrap_or_else(PoisonError::into_inner) = refuse;
    }
}

impl RemoteConnector for MockConnector {
    fn connect(&self, host: &str, port: u16) -> RigSyncResult<Box<dyn RemoteEndpoint>> {
        if *self.refuse.lock().unwrap_or_else(PoisonError::into_inner) {
            log::info!("[MOCK RADIO] CONNECT {host}:{port} → refused");
            return Err(RigSyncError::Connect(format!(
                "Failed to connect to {host}:{port}: connection refused"
            )));
        }
        log::info!("[MOCK RADIO] CONNECT {host}:{port}");
        self.radio.state().open = true;
        Ok(Box::new(self.radio.clone()))
    }
}
