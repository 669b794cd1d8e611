//! Pure decoding: rigctld reply text + command context → RigctlResponse.
//!
//! No I/O, no side effects. The `cmd` parameter tells us which lines to
//! expect: query replies are bare values, so without the context `2400`
//! could be a passband or a (very low) frequency.

use crate::domain::{RigSyncError, RigSyncResult};

use super::{rprt_description, RigctlCommand, RigctlResponse};

/// Decode a raw reply from rigctld into a typed RigctlResponse.
///
/// `response` is everything received for one command, newline separated.
/// `cmd` is the command that was sent, used to pick the right parser.
///
/// Returns `Err` for a non-zero `RPRT` code or a reply that cannot be parsed.
pub fn decode(response: &str, cmd: &RigctlCommand) -> RigSyncResult<RigctlResponse> {
    use RigctlCommand::*;

    let lines: Vec<&str> = response
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    // Any command may be answered with a status line instead of a value.
    if let Some(code) = lines.first().and_then(|l| parse_rprt(l)) {
        return match (code, cmd) {
            (0, SetFrequency(_) | SetMode { .. } | Quit) => Ok(RigctlResponse::Ack),
            (0, _) => Err(RigSyncError::Protocol(format!(
                "Expected a value for {cmd:?}, got 'RPRT 0'"
            ))),
            (code, _) => Err(RigSyncError::Protocol(format!(
                "rigctld rejected {cmd:?}: RPRT {code} ({})",
                rprt_description(code)
            ))),
        };
    }

    match cmd {
        GetFrequency => parse_frequency(&lines),
        GetMode => parse_mode(&lines),
        SetFrequency(_) | SetMode { .. } | Quit => Err(RigSyncError::Protocol(format!(
            "Expected 'RPRT 0' for {cmd:?}, got: '{}'",
            response.trim()
        ))),
    }
}

/// Parse `"RPRT -11"` → `Some(-11)`
fn parse_rprt(line: &str) -> Option<i32> {
    line.strip_prefix("RPRT")?.trim().parse().ok()
}

/// Parse `["14250000"]` → `FrequencyHz(14_250_000.0)`
fn parse_frequency(lines: &[&str]) -> RigSyncResult<RigctlResponse> {
    let line = lines
        .first()
        .ok_or_else(|| RigSyncError::Protocol("Empty frequency response".into()))?;
    let hz = line
        .parse::<f64>()
        .map_err(|e| RigSyncError::Protocol(format!("Failed to parse frequency '{line}': {e}")))?;
    if !hz.is_finite() || hz < 0.0 {
        return Err(RigSyncError::Read(format!(
            "Rig reported an invalid frequency: '{line}'"
        )));
    }
    Ok(RigctlResponse::FrequencyHz(hz))
}

/// Parse `["USB", "2400"]` → `Mode { mode: "USB", passband: 2400.0 }`
fn parse_mode(lines: &[&str]) -> RigSyncResult<RigctlResponse> {
    let [mode, passband, ..] = lines else {
        return Err(RigSyncError::Protocol(format!(
            "Invalid mode response: expected 2 lines, got {}",
            lines.len()
        )));
    };
    if mode.chars().any(char::is_whitespace) {
        return Err(RigSyncError::Protocol(format!("Invalid mode token: '{mode}'")));
    }
    let passband = passband.parse::<f64>().map_err(|e| {
        RigSyncError::Protocol(format!("Failed to parse passband '{passband}': {e}"))
    })?;
    Ok(RigctlResponse::Mode {
        mode: mode.to_string(),
        passband,
    })
}
