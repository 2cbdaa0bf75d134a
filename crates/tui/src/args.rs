use clap::Parser;
use std::{path::PathBuf, time::Duration};

/// Wave at the Wave Portal contract from your terminal.
#[derive(Clone, Debug, Parser)]
#[command(name = "waveportal", version, about, long_about = None)]
pub struct Args {
    /// The wallet provider's JSON-RPC endpoint.
    ///
    /// The endpoint holds the accounts and signs transactions itself, e.g. a wallet's local RPC
    /// server or a dev node with unlocked accounts. Without one the page behaves as if no wallet
    /// were installed.
    #[arg(long, visible_alias = "rpc", value_name = "URL", env = "ETH_RPC_URL")]
    pub rpc_url: Option<String>,

    /// How often to poll for new waves, in milliseconds.
    ///
    /// Defaults to 100 for localhost endpoints and 7000 otherwise.
    #[arg(long, value_name = "MILLIS", env = "WAVEPORTAL_POLL_INTERVAL")]
    pub poll_interval: Option<u64>,

    /// The file to write logs to.
    ///
    /// Defaults to `waveportal.log` in the system temp directory.
    #[arg(long, value_name = "PATH", env = "WAVEPORTAL_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval.map(Duration::from_millis)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| std::env::temp_dir().join("waveportal.log"))
    }
}
