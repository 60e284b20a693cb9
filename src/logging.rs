// 📝 Logging setup shared by the CLI and the server
//
// Logs go to stderr so CLI reports and exports on stdout stay clean.

use anyhow::{anyhow, Result};
use std::io::stderr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Build the filter: RUST_LOG wins, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(env_filter(default_level));

    tracing_subscriber::registry()
        .with(terminal_log)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_level_falls_back() {
        // Never panics, whatever the level string
        let filter = env_filter("definitely[not=a]filter");
        assert!(!filter.to_string().is_empty());
    }
}
