//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `wellscan=debug`
pub const LOG_ENV: &str = "WELLSCAN_LOG";

static INIT: Once = Once::new();

/// Default filter directive when `WELLSCAN_LOG` is unset or invalid
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "wellscan=debug"
    } else {
        "wellscan=info"
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays clean for
/// `--json` output. Calling it more than once is a no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        // Err means another subscriber won the race; keep it
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbose),
            )
            .with(filter)
            .try_init();
    });
}
