//! RigctlSession: owns a transport and drives rigctld request/response I/O.
//!
//! Think of this like a Python class that wraps a socket and adds the
//! rigctld protocol layer: write one command line, read until the reply is
//! complete, then hand the text to `decode`.
//!
//! Pure translation lives in `encode` / `decode`. RigctlSession only handles I/O.

use crate::domain::{RigSyncError, RigSyncResult};
use crate::ports::LineTransport;

use super::{decode, encode, RigctlCommand, RigctlResponse};

/// Chunk size for each transport read call
const READ_CHUNK_SIZE: usize = 64;

/// Max read attempts before giving up (~100ms per attempt → ~1s total)
const RESPONSE_TIMEOUT_READS: usize = 10;

/// Owns a transport and executes rigctld commands against it.
pub struct RigctlSession {
    transport: Box<dyn LineTransport>,
}

impl RigctlSession {
    pub fn new(transport: Box<dyn LineTransport>) -> Self {
        Self { transport }
    }

    /// Send a command and return the parsed response.
    ///
    /// Writes the wire string, reads until the expected number of reply
    /// lines (or an `RPRT` status line) has arrived, then delegates to `decode()`.
    pub fn execute(&mut self, cmd: &RigctlCommand) -> RigSyncResult<RigctlResponse> {
        let wire = encode(cmd);
        if !self.transport.is_connected() {
            return Err(RigSyncError::Disconnected(format!(
                "Command '{}' on a closed rigctld link",
                wire.trim_end()
            )));
        }
        log::debug!("RIGCTL TX: {}", wire.trim_end());

        if let Err(e) = self.transport.write(wire.as_bytes()) {
            self.transport.close();
            return Err(RigSyncError::Transport(format!(
                "Command '{}' write failed: {e}",
                wire.trim_end()
            )));
        }

        if cmd.reply_lines() == 0 {
            return Ok(RigctlResponse::Ack);
        }

        // A reply that did not arrive in full may still be in flight; if the
        // link stayed open the next command would read it as its own reply.
        let raw = self.read_reply(cmd, &wire).inspect_err(|e| {
            log::warn!("Dropping rigctld link: {e}");
            self.transport.close();
        })?;
        log::debug!("RIGCTL RX: {}", raw.trim_end().replace('\n', " | "));

        decode(&raw, cmd)
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Say goodbye to rigctld (best effort) and close the transport.
    pub fn close(&mut self) {
        if self.transport.is_connected() {
            if let Err(e) = self.execute(&RigctlCommand::Quit) {
                log::debug!("rigctld quit failed: {e}");
            }
        }
        self.transport.close();
    }

    /// Read bytes until the reply for `cmd` is complete or the attempts run out.
    fn read_reply(&mut self, cmd: &RigctlCommand, wire: &str) -> RigSyncResult<String> {
        let mut buf: Vec<u8> = Vec::with_capacity(READ_CHUNK_SIZE);
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        for _ in 0..RESPONSE_TIMEOUT_READS {
            match self.transport.read(&mut chunk) {
                Ok(n) if n > 0 => {
                    buf.extend_from_slice(&chunk[..n]);
                    if reply_complete(&buf, cmd.reply_lines()) {
                        break;
                    }
                }
                Ok(_) => {} // Zero bytes: read timed out, try again
                Err(e) => {
                    return Err(RigSyncError::Transport(format!(
                        "Command '{}' read failed: {e}",
                        wire.trim_end()
                    )));
                }
            }
        }

        if !reply_complete(&buf, cmd.reply_lines()) {
            return Err(RigSyncError::Transport(format!(
                "Command '{}': incomplete response from rigctld ({} bytes)",
                wire.trim_end(),
                buf.len()
            )));
        }

        String::from_utf8(buf)
            .map_err(|e| RigSyncError::Protocol(format!("Invalid UTF-8 response: {e}")))
    }
}

/// A reply is complete once it holds `expected` full lines, or a full `RPRT` line.
fn reply_complete(buf: &[u8], expected: usize) -> bool {
    let mut full_lines = 0;
    for line in buf.split_inclusive(|&b| b == b'\n') {
        if line.last() != Some(&b'\n') {
            break;
        }
        if line.starts_with(b"RPRT") {
            return true;
        }
        full_lines += 1;
    }
    full_lines >= expected
}
