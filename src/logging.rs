//! Diagnostic logging setup for the `fdi` binary.
//!
//! Logs go to stderr so stdout carries only computed outcomes. `RUST_LOG`
//! takes precedence over the `-v` count, e.g.
//!
//! ```bash
//! RUST_LOG=fdi_equilibria::domain::linalg=trace fdi horizontal
//! ```

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directive for a given `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose >= 2)
                .compact(),
        )
        .try_init();
}
