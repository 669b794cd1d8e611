//! Pure encoding: RigctlCommand → rigctld wire string.
//!
//! No I/O, no side effects. Easy to unit-test without any socket.

use super::RigctlCommand;

/// Encode a RigctlCommand into the rigctld wire string (including the `\n` terminator).
pub fn encode(cmd: &RigctlCommand) -> String {
    use RigctlCommand::*;
    match cmd {
        GetFrequency => "f\n".into(),
        SetFrequency(hz) => format!("F {hz}\n"),
        GetMode => "m\n".into(),
        SetMode { mode, passband } => format!("M {mode} {passband}\n"),
        Quit => "q\n".into(),
    }
}
