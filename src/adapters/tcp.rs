//! TCP transport adapter using `std::net`
//!
//! Implements `LineTransport` over a TcpStream and `RemoteConnector` for
//! rigctld. Think of `RigctlConnector` like a Python classmethod container:
//! it only knows how to open connections, it has no per-connection state.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::adapters::rigctl_client::RigctlClient;
use crate::domain::{RigSyncError, RigSyncResult};
use crate::ports::{LineTransport, RemoteConnector, RemoteEndpoint};

/// How long to wait for rigctld to accept the connection
const CONNECT_TIMEOUT_MS: u64 = 2_000;

/// Per-read timeout; the rigctl session retries several times
const READ_TIMEOUT_MS: u64 = 100;

/// Opens rigctld connections over TCP.
#[derive(Debug, Default, Clone, Copy)]
pub struct RigctlConnector;

impl RemoteConnector for RigctlConnector {
    fn connect(&self, host: &str, port: u16) -> RigSyncResult<Box<dyn RemoteEndpoint>> {
        let transport = TcpTransport::connect(host, port)?;
        log::info!("Connected to rigctld at {host}:{port}");
        Ok(Box::new(RigctlClient::new(Box::new(transport))))
    }
}

/// An open TCP connection to a rigctl server.
pub struct TcpTransport {
    stream: TcpStream,
    connected: bool,
}

impl TcpTransport {
    /// Resolve `host:port` and connect to the first address that answers.
    pub fn connect(host: &str, port: u16) -> RigSyncResult<Self> {
        let addrs = (host, port)
            .to_socket_addrs()
            .map_err(|e| RigSyncError::Connect(format!("Failed to resolve {host}:{port}: {e}")))?;

        let mut last_err = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, Duration::from_millis(CONNECT_TIMEOUT_MS)) {
                Ok(stream) => return Self::from_stream(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(RigSyncError::Connect(match last_err {
            Some(e) => format!("Failed to connect to {host}:{port}: {e}"),
            None => format!("No addresses found for {host}:{port}"),
        }))
    }

    fn from_stream(stream: TcpStream) -> RigSyncResult<Self> {
        stream
            .set_read_timeout(Some(Duration::from_millis(READ_TIMEOUT_MS)))
            .and_then(|_| stream.set_nodelay(true))
            .map_err(|e| RigSyncError::Connect(format!("Failed to configure socket: {e}")))?;
        Ok(Self {
            stream,
            connected: true,
        })
    }
}

impl LineTransport for TcpTransport {
    fn write(&mut self, data: &[u8]) -> RigSyncResult<usize> {
        self.stream.write_all(data).map_err(|e| {
            self.connected = false;
            RigSyncError::Transport(format!("Write failed: {e}"))
        })?;
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> RigSyncResult<usize> {
        match self.stream.read(buffer) {
            Ok(0) => {
                self.connected = false;
                Err(RigSyncError::Disconnected("rigctld closed the connection".into()))
            }
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) => {
                self.connected = false;
                Err(RigSyncError::Transport(format!("Read failed: {e}")))
            }
        }
    }

    fn close(&mut self) {
        if self.connected {
            // The peer may already be gone; nothing useful to do with the error
            let _ = self.stream.shutdown(Shutdown::Both);
        }
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}
