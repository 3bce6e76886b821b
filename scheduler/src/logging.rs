//! Logging setup for the simulator.
//!
//! Logs go to stderr so that traces and reports on stdout stay clean.
//! `RUST_LOG` takes precedence over the level passed on the command line:
//!
//! ```bash
//! RUST_LOG=scheduling::scheduler=debug scheduling-simulator -p sjf schedules/example.csv
//! ```
//!
//! - TRACE: every simulated tick
//! - DEBUG: dispatch decisions and process completions
//! - INFO: simulation start and finish
//! - WARN: idle ticks

use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub fn init_logging() {
    init_logging_with_level(DEFAULT_LOG_LEVEL)
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("scheduling={level},scheduling_simulator={level}").into()
    });

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true),
        )
        .with(filter)
        .try_init();
}
