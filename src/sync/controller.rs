//! Start/stop lifecycle of a sync session.
//!
//! Two locks, never nested in the other order:
//! - `lifecycle` serializes `start`/`stop`/`update_config` callers and owns
//!   the worker handle and its cancel sender.
//! - `session` is the data lock the poll thread takes once per cycle.
//!
//! `stop` first flips the session to Stopping under the data lock (waiting
//! out any in-flight cycle), then drops the cancel sender to wake the
//! thread, joins it, and only then closes the remote.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;

use crate::domain::{RigSyncError, RigSyncResult, SessionPhase, SyncConfig, SyncStatus};
use crate::ports::{LocalEndpoint, RemoteConnector};

use super::engine::{Mirrors, Reconciler};
use super::poll::run_poll_loop;
use super::session::SyncSession;

struct Lifecycle {
    config: SyncConfig,
    connector: Box<dyn RemoteConnector>,
    worker: Option<JoinHandle<()>>,
    cancel: Option<Sender<()>>,
}

pub struct SyncController {
    session: Arc<Mutex<SyncSession>>,
    lifecycle: Mutex<Lifecycle>,
}

impl SyncController {
    pub fn new(
        config: SyncConfig,
        connector: Box<dyn RemoteConnector>,
        local: Box<dyn LocalEndpoint>,
    ) -> RigSyncResult<Self> {
        config.validate()?;
        Ok(Self {
            session: Arc::new(Mutex::new(SyncSession::new(local))),
            lifecycle: Mutex::new(Lifecycle {
                config,
                connector,
                worker: None,
                cancel: None,
            }),
        })
    }

    fn session(&self) -> MutexGuard<'_, SyncSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Connect, seed and start polling. A no-op if already running.
    pub fn start(&self) -> RigSyncResult<()> {
        let mut lifecycle = self.lifecycle();
        if self.session().phase() == SessionPhase::Running {
            log::debug!("Sync already running");
            return Ok(());
        }
        // A worker that stopped on its own (error limit, lost link) is still joinable
        Self::reap(&mut lifecycle);

        let config = lifecycle.config.clone();
        log::info!(
            "Starting sync '{}' with rigctld at {}:{}",
            config.name,
            config.host,
            config.port
        );
        let remote = lifecycle
            .connector
            .connect(&config.host, config.port)
            .inspect_err(|e| log::error!("{e}"))?;

        let reconciler = Reconciler::new(&config);
        self.session().begin(remote, &reconciler)?;

        let (cancel_tx, cancel_rx) = crossbeam_channel::bounded::<()>(1);
        let session = Arc::clone(&self.session);
        let period = config.poll_period();
        let max_errors = config.max_consecutive_errors;
        let spawned = thread::Builder::new()
            .name("rigsync-poll".into())
            .spawn(move || run_poll_loop(session, reconciler, cancel_rx, period, max_errors));

        match spawned {
            Ok(handle) => {
                lifecycle.worker = Some(handle);
                lifecycle.cancel = Some(cancel_tx);
                Ok(())
            }
            Err(e) => {
                self.session().shutdown();
                Err(RigSyncError::Connect(format!("Failed to spawn poll thread: {e}")))
            }
        }
    }

    /// Stop polling and close the remote. Safe to call when not running.
    pub fn stop(&self) {
        let mut lifecycle = self.lifecycle();
        if self.session().request_stop() {
            log::info!("Stopping sync");
        }
        Self::reap(&mut lifecycle);
        self.session().shutdown();
    }

    /// Wake the worker (dropping the sender ends its wait) and join it.
    fn reap(lifecycle: &mut Lifecycle) {
        lifecycle.cancel.take();
        if let Some(handle) = lifecycle.worker.take() {
            if handle.join().is_err() {
                log::error!("Poll thread panicked");
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.session().phase()
    }

    pub fn is_running(&self) -> bool {
        self.phase() == SessionPhase::Running
    }

    pub fn status(&self) -> SyncStatus {
        self.session().status()
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.session().consecutive_errors()
    }

    /// Snapshot of the last observed values on both sides.
    pub fn mirrors(&self) -> Mirrors {
        self.session().mirrors().clone()
    }

    pub fn config(&self) -> SyncConfig {
        self.lifecycle().config.clone()
    }

    /// Replace the configuration. Only allowed while not running.
    pub fn update_config(&self, config: SyncConfig) -> RigSyncResult<()> {
        let mut lifecycle = self.lifecycle();
        if self.session().phase() != SessionPhase::Idle {
            return Err(RigSyncError::Config(
                "Cannot change configuration while sync is running".into(),
            ));
        }
        config.validate()?;
        lifecycle.config = config;
        Ok(())
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.stop();
    }
}
