//! Hamlib `rigctld` command layer.
//!
//! This module separates the three concerns of talking to rigctld:
//! - `encode`: translate RigctlCommand → wire string (pure, no I/O)
//! - `decode`: translate wire text → RigctlResponse (pure, no I/O)
//! - `session`: own the transport, drive the read-until-complete loop
//!
//! The protocol is newline-terminated text. Queries answer with bare value
//! lines (`14250000`, `USB` + `2400`); set commands answer `RPRT 0` on success
//! and `RPRT <negative code>` on failure.

pub mod decode;
pub mod encode;
pub mod session;

pub use decode::decode;
pub use encode::encode;
pub use session::RigctlSession;

/// Hamlib status codes as (RPRT code, description).
pub const RPRT_TABLE: &[(i32, &str)] = &[
    (-1, "invalid parameter"),
    (-2, "invalid configuration"),
    (-3, "memory shortage"),
    (-4, "function not implemented"),
    (-5, "communication timed out"),
    (-6, "IO error"),
    (-7, "internal Hamlib error"),
    (-8, "protocol error"),
    (-9, "command rejected by the rig"),
    (-10, "command performed, but arg truncated"),
    (-11, "function not available"),
    (-12, "VFO not targetable"),
    (-13, "error talking on the bus"),
    (-14, "collision on the bus"),
    (-15, "NULL RIG handle or invalid pointer parameter"),
    (-16, "invalid VFO"),
    (-17, "argument out of domain of func"),
];

/// Human-readable text for an `RPRT` code.
pub fn rprt_description(code: i32) -> &'static str {
    RPRT_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, text)| *text)
        .unwrap_or("unknown error")
}

/// Commands understood by rigctld (default protocol).
#[derive(Debug, PartialEq, Clone)]
pub enum RigctlCommand {
    // Frequency of the current VFO
    GetFrequency,
    /// Hz; rigctld parses this as a double, so fractions go through as-is
    SetFrequency(f64),
    // Mode and passband
    GetMode,
    /// Hamlib mode token (e.g. "USB") and passband in Hz; 0 keeps the rig's default
    SetMode { mode: String, passband: u32 },
    /// Close the connection; rigctld does not reply
    Quit,
}

impl RigctlCommand {
    /// Number of lines a successful reply carries.
    pub fn reply_lines(&self) -> usize {
        match self {
            RigctlCommand::GetMode => 2,
            RigctlCommand::Quit => 0,
            _ => 1,
        }
    }
}

/// Parsed responses from rigctld.
#[derive(Debug, PartialEq)]
pub enum RigctlResponse {
    FrequencyHz(f64),
    /// Hamlib mode token and passband in Hz
    Mode { mode: String, passband: f64 },
    /// Command accepted; rigctld returned `RPRT 0`
    Ack,
}
