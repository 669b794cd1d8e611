//! Sync session state: phase, the owned endpoints, mirrors and the error budget.
//!
//! A `SyncSession` lives behind one `Mutex` shared by the controller and the
//! poll thread. Every poll cycle holds that lock from the first read to the
//! last write, so a stop request can never observe (or close the remote in)
//! the middle of a cycle.

use crate::domain::{RigSyncError, RigSyncResult, SessionPhase, SyncStatus};
use crate::ports::{LocalEndpoint, RemoteEndpoint};

use super::engine::{Mirrors, Reconciler};

/// What the poll loop should do after a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

pub struct SyncSession {
    phase: SessionPhase,
    remote: Option<Box<dyn RemoteEndpoint>>,
    local: Box<dyn LocalEndpoint>,
    mirrors: Mirrors,
    consecutive_errors: u32,
}

impl SyncSession {
    pub fn new(local: Box<dyn LocalEndpoint>) -> Self {
        Self {
            phase: SessionPhase::Idle,
            remote: None,
            local,
            mirrors: Mirrors::default(),
            consecutive_errors: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mirrors(&self) -> &Mirrors {
        &self.mirrors
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    /// Status indicator: Idle when not running, else whether the remote link is up.
    pub fn status(&self) -> SyncStatus {
        match (self.phase, &self.remote) {
            (SessionPhase::Idle, _) => SyncStatus::Idle,
            (_, Some(remote)) if remote.is_open() => SyncStatus::Connected,
            _ => SyncStatus::Disconnected,
        }
    }

    /// Take ownership of a freshly connected remote, seed the mirrors and go Running.
    ///
    /// If seeding fails the remote is closed and the session stays Idle.
    pub fn begin(
        &mut self,
        mut remote: Box<dyn RemoteEndpoint>,
        reconciler: &Reconciler,
    ) -> RigSyncResult<()> {
        if self.phase != SessionPhase::Idle {
            remote.close();
            return Err(RigSyncError::Connect("Sync session already active".into()));
        }

        let mirrors = match reconciler.seed(&mut *remote, &*self.local) {
            Ok(mirrors) => mirrors,
            Err(e) => {
                remote.close();
                return Err(RigSyncError::Connect(format!("Initial read failed: {e}")));
            }
        };

        log::info!(
            "Sync started: rig {:?}, tuner {:?}",
            mirrors.remote_freq,
            mirrors.local_freq
        );
        self.mirrors = mirrors;
        self.remote = Some(remote);
        self.consecutive_errors = 0;
        self.phase = SessionPhase::Running;
        Ok(())
    }

    /// One poll cycle. Caller holds the session lock for the whole call.
    pub fn poll_once(&mut self, reconciler: &Reconciler, max_errors: u32) -> LoopControl {
        if self.phase != SessionPhase::Running {
            return LoopControl::Stop;
        }

        let Some(remote) = self.remote.as_mut().filter(|r| r.is_open()) else {
            log::error!("Rig connection lost; stopping sync");
            self.shutdown();
            return LoopControl::Stop;
        };

        let failures = reconciler.run_cycle(&mut self.mirrors, &mut **remote, &mut *self.local);
        if failures.is_empty() {
            if self.consecutive_errors > 0 {
                log::info!("Sync recovered after {} failed cycle(s)", self.consecutive_errors);
            }
            self.consecutive_errors = 0;
            return LoopControl::Continue;
        }

        self.consecutive_errors += 1;
        log::debug!(
            "Cycle failed ({}/{max_errors}): {}",
            self.consecutive_errors,
            failures[0]
        );
        if self.consecutive_errors > max_errors {
            log::error!(
                "{} consecutive failed cycles (limit {max_errors}); stopping sync",
                self.consecutive_errors
            );
            self.shutdown();
            return LoopControl::Stop;
        }
        LoopControl::Continue
    }

    /// Running → Stopping. Returns `false` if the session was not running.
    pub fn request_stop(&mut self) -> bool {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Stopping;
            true
        } else {
            false
        }
    }

    /// Close and drop the remote (if still held) and go Idle. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(mut remote) = self.remote.take() {
            remote.close();
            log::info!("Rig connection closed");
        }
        self.phase = SessionPhase::Idle;
    }
}
