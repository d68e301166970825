//! Logging configuration using tracing

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable controlling the log filter.
pub const LOG_ENV: &str = "APIDOCS_LOG";

/// Initialize the logging subsystem.
///
/// Logs go to stderr so that `endpoints`/`try` output on stdout stays clean.
///
/// ```bash
/// APIDOCS_LOG=debug apidocs-console serve
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("apidocs_console=info,warn"));

    // try_init: tests and embedders may have installed a subscriber already
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init();
}
