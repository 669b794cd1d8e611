//! rigsync
//!
//! Keeps a rigctl-controlled radio and an SDR tuner on the same frequency,
//! and optionally the same demodulation mode and passband, in both directions.
//!
//! ## Architecture (Hexagonal / Ports & Adapters)
//!
//! - `domain/` - Pure domain types, no I/O dependencies
//! - `ports/` - Trait definitions for the radio side, the tuner side and the byte transport
//! - `rigctl/` - Hamlib rigctld text protocol (encode, decode, request/response session)
//! - `sync/` - Reconciliation engine, session lifecycle and poll thread
//! - `adapters/` - Implementations of ports (TCP rigctld client, mock radio, simulated tuner, profile store)

// Core domain (pure, no I/O)
pub mod domain;
pub mod ports;
pub mod rigctl;
pub mod sync;

// Adapters (external I/O)
pub mod adapters;

pub use domain::{RigSyncError, RigSyncResult};
pub use sync::SyncController;
