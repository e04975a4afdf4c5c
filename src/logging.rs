// Diagnostic logging on stderr, filtered by `APOD_LOG`.

use tracing_subscriber::EnvFilter;

pub const LOG_VAR: &str = "APOD_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install the global `tracing` subscriber. `APOD_LOG` takes an
/// `EnvFilter` directive such as `debug` or `apod::api=trace`; an invalid
/// directive falls back to `warn`.
pub fn init_tracing() {
    let filter = std::env::var(LOG_VAR)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
