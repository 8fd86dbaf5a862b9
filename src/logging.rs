//! Structured logging setup
//!
//! Logging is only initialised once the server starts. Until then errors are
//! written directly to the invoking streams, see [`crate::cli::report`].

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Map a `log.level` property to a level filter
pub fn level_from_property(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "fatal" | "error" => Some(LevelFilter::ERROR),
        "warn" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" | "all" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

/// Install the global subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`. Returns `false` when a
/// subscriber was already installed.
pub fn init(level: LevelFilter) -> bool {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    let initialised = tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .try_init()
        .is_ok();

    if initialised {
        tracing::debug!("Logging initialised at {}", level);
    }
    initialised
}
