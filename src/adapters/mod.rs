//! Adapters: implementations of the port traits
//!
//! - `rigctl_client` / `tcp` - rigctld over TCP (the real radio side)
//! - `mock_radio` - in-memory radio for development and tests
//! - `simulated_tuner` - in-memory SDR display/tuner
//! - `config_store` - JSON profile persistence

pub mod config_store;
pub mod mock_radio;
pub mod rigctl_client;
pub mod simulated_tuner;
pub mod tcp;

pub use config_store::ConfigStore;
pub use mock_radio::{MockConnector, MockRadio};
pub use rigctl_client::RigctlClient;
pub use simulated_tuner::SimulatedTuner;
pub use tcp::{RigctlConnector, TcpTransport};
