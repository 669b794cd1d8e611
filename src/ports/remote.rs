//! Remote radio control port traits

use crate::domain::{Frequency, RigSyncResult};

/// Factory for remote connections.
/// `connect` hands back a boxed endpoint that the session then owns exclusively.
pub trait RemoteConnector: Send {
    /// Open a control connection to the radio at `host:port`
    fn connect(&self, host: &str, port: u16) -> RigSyncResult<Box<dyn RemoteEndpoint>>;
}

/// An open control connection to the radio (frequency, mode, passband).
/// Only requires `Send` (not `Sync`): always accessed behind the session lock.
pub trait RemoteEndpoint: Send {
    /// Get current VFO frequency
    fn get_frequency(&mut self) -> RigSyncResult<Frequency>;

    /// Set VFO frequency
    fn set_frequency(&mut self, freq: Frequency) -> RigSyncResult<()>;

    /// Get current mode token (e.g., "USB", "FM") and passband in Hz
    fn get_mode(&mut self) -> RigSyncResult<(String, f64)>;

    /// Set mode token and passband in Hz
    fn set_mode(&mut self, mode: &str, passband: f64) -> RigSyncResult<()>;

    /// Check if the connection is still usable
    fn is_open(&self) -> bool;

    /// Close the connection
    fn close(&mut self);
}
