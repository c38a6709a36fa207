pub use tracing::{debug, error, info, instrument, trace, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

fn subscriber() -> impl tracing::Subscriber + Send + Sync + 'static {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Span close events carry the per-stage timings (decode, count_colors, blur...).
    let filter = env_filter.to_string();
    let is_debug = filter.contains("debug") || filter.contains("trace");

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
}

/// Installs the global subscriber. Panics if one is already set.
pub fn init() {
    subscriber().init();
}

/// Like `init`, but leaves an existing subscriber in place.
pub fn try_init() -> Result<(), TryInitError> {
    subscriber().try_init()
}
