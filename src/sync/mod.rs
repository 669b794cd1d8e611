//! Sync engine
//!
//! Keeps a remote rig and the local tuner on the same frequency (and
//! optionally mode/passband):
//!
//! - `modes` - local mode ↔ rigctl token table
//! - `engine` - the two reconciliation passes over the mirrors
//! - `session` - phase, owned endpoints and error escalation
//! - `poll` - the periodic worker thread
//! - `controller` - start/stop/status facade used by the application

pub mod controller;
pub mod engine;
pub mod modes;
pub mod poll;
pub mod session;

pub use controller::SyncController;
pub use engine::{Mirrors, Reconciler};
pub use modes::{ModeMap, MODE_TABLE};
pub use session::{LoopControl, SyncSession};
