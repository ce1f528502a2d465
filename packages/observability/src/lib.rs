//! # Observability
//!
//! Centralized observability layer for the HiLi client workspace.
//!
//! Binaries are **log producers**, not log consumers. They call
//! [`init`] once at startup and use standard `tracing` macros throughout
//! their code. They have zero knowledge of where logs go or who reads them.
//!
//! All processes write structured JSONL to a single central file:
//! `~/.hili/logs/dev.jsonl`
//!
//! This enables:
//! - `tail -f ~/.hili/logs/dev.jsonl` for raw streaming
//! - `tail -f ~/.hili/logs/dev.jsonl | jq` for pretty JSON
//!
//! Multi-process safety is achieved through append-only writes with
//! per-line flush semantics.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init("cli");
//!     tracing::info!("ready");
//! }
//! ```
//!
//! Or with configuration:
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         also_stderr: true,
//!         ..Default::default()
//!     });
//! }
//! ```

mod writer;

use std::path::PathBuf;

pub use writer::CentralLogWriter;

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "cli"). Logged at startup for filtering.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by the `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path.
    /// Defaults to `~/.hili/logs/dev.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr for immediate feedback.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize the observability layer with default settings.
///
/// # Panics
///
/// Panics if the log file cannot be created or opened.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize the observability layer with custom configuration.
pub fn init_with_config(config: LogConfig) {
    writer::init_subscriber(&config);
}

/// Re-export tracing macros for convenience.
/// Services can use `observability::info!()` or `tracing::info!()`.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export the span macro for structured context.
pub use tracing::span;

/// Re-export Level for advanced filtering.
pub use tracing::Level;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
    }
}
