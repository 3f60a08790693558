//! Logging and output control
//!
//! This module provides the [`Logger`] handed to every registry operation. It
//! forwards messages to `tracing` so the binary decides where they end up, and
//! it can be silenced entirely for library callers that only want results.

use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Logger responsible for all diagnostic output of the registry layer
#[derive(Debug, Clone)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Logger {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            quiet: false,
        }
    }

    pub fn new_quiet() -> Self {
        Self {
            verbose: false,
            quiet: true,
        }
    }

    pub fn debug(&self, message: &str) {
        if !self.quiet {
            tracing::debug!("{}", message);
        }
    }

    /// Only emitted when the logger was built verbose
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            tracing::debug!("{}", message);
        }
    }

    pub fn detail(&self, message: &str) {
        if self.verbose && !self.quiet {
            tracing::trace!("{}", message);
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            tracing::info!(outcome = "success", "{}", message);
        }
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            tracing::warn!("{}", message);
        }
    }

    /// Errors are never silenced
    pub fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    /// Format duration in human-readable format
    pub fn format_duration(&self, duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{}.{:03}s", secs, duration.subsec_millis())
        } else if secs < 3600 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else {
            format!("{}h{}m{}s", secs / 3600, (secs % 3600) / 60, secs % 60)
        }
    }
}

/// Human-readable size using binary multiples, two decimals above bytes.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
