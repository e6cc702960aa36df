//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so stdout carries only the report (or JSON). `RUST_LOG`
//! takes precedence over `--log-level` when set.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow!("invalid log level '{level}': {e}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("logging already initialised: {e}"))
}
