use eyre::{Result, WrapErr};
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "waveportal=info";

/// Initializes the global tracing subscriber, appending plain-text logs to `log_file`.
///
/// The terminal belongs to the page, so nothing is logged to stdout or stderr.
pub fn subscriber(log_file: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(log_file)
        .wrap_err_with(|| format!("failed to open log file {}", log_file.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre::eyre!("failed to install tracing subscriber: {err}"))
}
