//! rigctld radio adapter
//!
//! rigctld (Hamlib's network rig daemon) speaks a simple text protocol:
//! - Send a command like `f` (get frequency)
//! - Daemon replies like `14250000` (frequency in Hz)
//! - Set commands reply `RPRT 0`, or `RPRT <negative code>` on failure
//!
//! RigctlClient translates RemoteEndpoint calls into RigctlCommands and runs
//! them through a RigctlSession that owns the transport.

use crate::domain::{Frequency, RigSyncError, RigSyncResult};
use crate::ports::{LineTransport, RemoteEndpoint};
use crate::rigctl::{RigctlCommand, RigctlResponse, RigctlSession};

/// rigctld adapter. Owns the protocol session and tracks whether it was closed.
pub struct RigctlClient {
    session: RigctlSession,
    closed: bool,
}

impl RigctlClient {
    pub fn new(transport: Box<dyn LineTransport>) -> Self {
        Self {
            session: RigctlSession::new(transport),
            closed: false,
        }
    }

    fn execute(&mut self, cmd: &RigctlCommand) -> RigSyncResult<RigctlResponse> {
        if self.closed {
            return Err(RigSyncError::Disconnected(format!(
                "{cmd:?} on a closed rigctld connection"
            )));
        }
        self.session.execute(cmd)
    }

    /// Check a frequency is sendable. Fractional Hz are kept: the rig must
    /// report back exactly what the sync engine wrote.
    fn frequency_to_wire(freq: Frequency) -> RigSyncResult<f64> {
        let hz = freq.as_hz();
        if !hz.is_finite() || hz < 0.0 {
            return Err(RigSyncError::Write(format!("Cannot send frequency {hz} Hz")));
        }
        Ok(hz)
    }

    /// Convert a passband to the whole-Hz value rigctld expects (0 = rig default).
    fn passband_to_wire(passband: f64) -> RigSyncResult<u32> {
        if !passband.is_finite() || passband < 0.0 || passband > u32::MAX as f64 {
            return Err(RigSyncError::Write(format!("Cannot send passband {passband} Hz")));
        }
        Ok(passband.round() as u32)
    }
}

impl RemoteEndpoint for RigctlClient {
    fn get_frequency(&mut self) -> RigSyncResult<Frequency> {
        match self.execute(&RigctlCommand::GetFrequency)? {
            RigctlResponse::FrequencyHz(hz) => Ok(Frequency::hz(hz)),
            other => Err(RigSyncError::Read(format!(
                "Unexpected reply to frequency query: {other:?}"
            ))),
        }
    }

    fn set_frequency(&mut self, freq: Frequency) -> RigSyncResult<()> {
        let hz = Self::frequency_to_wire(freq)?;
        self.execute(&RigctlCommand::SetFrequency(hz))?;
        Ok(())
    }

    fn get_mode(&mut self) -> RigSyncResult<(String, f64)> {
        match self.execute(&RigctlCommand::GetMode)? {
            RigctlResponse::Mode { mode, passband } => Ok((mode, passband)),
            other => Err(RigSyncError::Read(format!(
                "Unexpected reply to mode query: {other:?}"
            ))),
        }
    }

    fn set_mode(&mut self, mode: &str, passband: f64) -> RigSyncResult<()> {
        if mode.is_empty() || mode.chars().any(char::is_whitespace) {
            return Err(RigSyncError::Write(format!("Invalid mode token: '{mode}'")));
        }
        let passband = Self::passband_to_wire(passband)?;
        self.execute(&RigctlCommand::SetMode {
            mode: mode.to_string(),
            passband,
        })?;
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.closed && self.session.is_connected()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.session.close();
        self.closed = true;
        log::info!("rigctld connection closed");
    }
}
