//! Byte transport trait for line-oriented control protocols

use crate::domain::RigSyncResult;

/// An open byte stream to a rig control server.
/// Only requires `Send` (not `Sync`): always owned by a single session.
pub trait LineTransport: Send {
    /// Write bytes to the stream
    fn write(&mut self, data: &[u8]) -> RigSyncResult<usize>;

    /// Read bytes from the stream (with timeout).
    /// `Ok(0)` means the read timed out with nothing available.
    fn read(&mut self, buffer: &mut [u8]) -> RigSyncResult<usize>;

    /// Close the stream
    fn close(&mut self);

    /// Check if the stream is still connected
    fn is_connected(&self) -> bool;
}
