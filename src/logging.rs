use crate::config::LogLevel;
use anyhow::{Result, anyhow};
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoUtc;

/// Build the filter for `level`. `RUST_LOG` takes precedence when set.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::from_str(level.as_directive()).unwrap_or_else(|_| EnvFilter::new("warn"))
    })
}

/// Initialize logging to stderr at `level`
pub fn init_logging(level: LogLevel) -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_env_filter(env_filter(level))
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
