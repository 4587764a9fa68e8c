//! Logging setup
//!
//! Log lines go to stderr so that command output on stdout stays clean.
//! `RUST_LOG` takes precedence over the `--log-level` flag.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter when neither `RUST_LOG` nor `--log-level` is given
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub fn init_tracing(level: Option<&str>) {
    let level = level.unwrap_or(DEFAULT_LOG_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Ignore a second initialisation (e.g. from tests)
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}
