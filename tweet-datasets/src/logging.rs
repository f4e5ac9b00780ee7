use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::Level;

/// Accepted values for `--log-level`, from more verbose to less verbose.
pub const LOG_LEVELS: [&str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// Map a `--log-level` argument to a tracing level. `CRITICAL` has no
/// tracing counterpart and collapses into `ERROR`.
pub fn parse_level(level: &str) -> Option<Level> {
    match level {
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        "CRITICAL" => Some(Level::ERROR),
        _ => None,
    }
}

/// Initialize the global subscriber. With a log file, output is appended
/// after a separator line so runs stay distinguishable; otherwise it goes
/// to stderr.
pub fn init(level: Level, log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let mut file = OpenOptions::new().append(true).create(true).open(path)?;
            writeln!(file, "\n{}", "*".repeat(80))?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}
