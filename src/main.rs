//! rigsync demo: sync a rigctld radio (or the mock radio) with a simulated tuner.
//!
//!   MOCK_RADIO=1 RUST_LOG=rigsync_lib=debug cargo run -- Shack
//!
//! Commands on stdin: `tune <hz>`, `mode <MODE>`, `status`, `start`, `stop`, `quit`.

use std::env;
use std::io::{self, BufRead};

use rigsync_lib::adapters::{ConfigStore, MockConnector, MockRadio, RigctlConnector, SimulatedTuner};
use rigsync_lib::domain::{Frequency, Mode};
use rigsync_lib::ports::{LocalEndpoint, RemoteConnector};
use rigsync_lib::{RigSyncResult, SyncController};

const DEFAULT_CONFIG_DIR: &str = "./configs";

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("rigsync=info,rigsync_lib=info"),
    )
    .init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> RigSyncResult<()> {
    let profile = env::args().nth(1).unwrap_or_else(|| "Default".to_string());
    let dir = env::var("RIGSYNC_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let store = ConfigStore::new(dir);
    let config = store.load_or_default(&profile);
    log::info!("Using profile '{}' from {}", config.name, store.dir().display());

    let connector: Box<dyn RemoteConnector> = if env::var("MOCK_RADIO").is_ok_and(|v| v == "1") {
        log::info!("MOCK_RADIO=1: using the in-memory radio");
        Box::new(MockConnector::new(MockRadio::new()))
    } else {
        Box::new(RigctlConnector)
    };

    let vfo = config.vfo.clone();
    let tuner = SimulatedTuner::new(Frequency::hz(100_000_000.0), &vfo);
    let sync = SyncController::new(config, connector, Box::new(tuner.clone()))?;
    if let Err(e) = sync.start() {
        log::warn!("Sync not started: {e} (type `start` to retry)");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("stdin: {e}");
                break;
            }
        };
        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("tune"), Some(hz)) => match hz.parse::<f64>() {
                Ok(hz) if hz > 0.0 => tuner.click_tune(&vfo, Frequency::hz(hz)),
                _ => println!("tune: expected a frequency in Hz"),
            },
            (Some("mode"), Some(name)) => match name.parse::<Mode>() {
                Ok(mode) => {
                    if let Err(e) = tuner.clone().set_mode(&vfo, mode) {
                        println!("mode: {e}");
                    }
                }
                Err(e) => println!("mode: {e}"),
            },
            (Some("status"), None) => {
                let mirrors = sync.mirrors();
                println!(
                    "{:?} ({:?}), {} consecutive errors",
                    sync.status(),
                    sync.phase(),
                    sync.consecutive_errors()
                );
                println!("  rig:   {:?} {:?} {:?}", mirrors.remote_freq, mirrors.remote_mode, mirrors.remote_passband);
                println!("  tuner: {:?} {:?} {:?}", mirrors.local_freq, mirrors.local_mode, mirrors.local_passband);
            }
            (Some("start"), None) => {
                if let Err(e) = sync.start() {
                    println!("start: {e}");
                }
            }
            (Some("stop"), None) => sync.stop(),
            (Some("quit"), None) => break,
            (None, _) => {}
            _ => println!("commands: tune <hz>, mode <MODE>, status, start, stop, quit"),
        }
    }

    sync.stop();
    Ok(())
}
