//! Port traits (interfaces)
//!
//! These traits define the boundaries between the sync engine and the two
//! sides it keeps consistent. Adapters implement them for real hardware,
//! rigctld, the SDR host, or in-memory stand-ins.

pub mod local;
pub mod remote;
pub mod transport;

pub use local::*;
pub use remote::*;
pub use transport::*;
