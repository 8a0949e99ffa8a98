//! Tracing initialization.
//!
//! Uses `ObservabilityConfig` for PYLAUNCH_QUIET, PYLAUNCH_LOG_LEVEL and PYLAUNCH_LOG_JSON.
//! Logs go to stderr: stdout belongs to the launched application.

use pylaunch_core::config::ObservabilityConfig;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Call once at startup, after the project `.env` has been loaded.
/// With PYLAUNCH_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level: &str = if cfg.quiet { "pylaunch=warn" } else { &cfg.log_level };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}
