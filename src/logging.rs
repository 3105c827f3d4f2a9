use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber writing to stderr
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `info`, or `debug`
/// when `verbose` is on.
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("poiscrape={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}
