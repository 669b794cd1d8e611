//! The poll thread body.
//!
//! Think of this like a Python `while not stop_event.wait(period): ...` loop:
//! the cancel channel doubles as the sleep, so a stop request (dropping the
//! sender) wakes the thread immediately instead of after a full period.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};

use super::engine::Reconciler;
use super::session::{LoopControl, SyncSession};

/// Run poll cycles every `period` until cancelled or the session stops itself.
pub fn run_poll_loop(
    session: Arc<Mutex<SyncSession>>,
    reconciler: Reconciler,
    cancel: Receiver<()>,
    period: Duration,
    max_errors: u32,
) {
    log::debug!("Poll thread started ({period:?} period)");
    loop {
        match cancel.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        let control = session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .poll_once(&reconciler, max_errors);
        if control == LoopControl::Stop {
            break;
        }
    }
    log::debug!("Poll thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockRadio, SimulatedTuner};
    use crate::domain::{Frequency, SessionPhase, SyncConfig};
    use std::thread;
    use std::time::Instant;

    fn running_session(radio: &MockRadio) -> (Arc<Mutex<SyncSession>>, Reconciler) {
        let reconciler = Reconciler::new(&SyncConfig::default());
        let tuner = SimulatedTuner::new(radio.frequency(), "Radio");
        let mut session = SyncSession::new(Box::new(tuner));
        session.begin(Box::new(radio.clone()), &reconciler).unwrap();
        (Arc::new(Mutex::new(session)), reconciler)
    }

    #[test]
    fn dropping_sender_wakes_loop_early() {
        let radio = MockRadio::new();
        let (session, reconciler) = running_session(&radio);
        let (tx, rx) = crossbeam_channel::bounded::<()>(1);

        let started = Instant::now();
        let handle = thread::spawn({
            let session = session.clone();
            move || run_poll_loop(session, reconciler, rx, Duration::from_secs(30), 16)
        });
        drop(tx);
        handle.join().unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn loop_ends_when_session_escalates() {
        let radio = MockRadio::with_frequency(Frequency::hz(7_074_000.0));
        let (session, reconciler) = running_session(&radio);
        radio.set_fail_reads(true);
        let (_tx, rx) = crossbeam_channel::bounded::<()>(1);

        run_poll_loop(session.clone(), reconciler, rx, Duration::from_millis(1), 2);

        assert_eq!(session.lock().unwrap().phase(), SessionPhase::Idle);
        assert_eq!(radio.close_count(), 1);
    }
}
