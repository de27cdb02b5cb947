//! Logging integration for trackway.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating the spans that wrap
//! route recognition and generation.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The log level is read from `settings.log_level` (e.g. "debug", "info", "warn",
/// "error", or a full `EnvFilter` directive such as `"trackway_routing=trace"`).
/// In debug mode a pretty, human-readable format is used; otherwise a structured
/// JSON format is used.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one routing operation.
///
/// `operation` names what the router is doing (`"recognize"`, `"generate"`)
/// and `target` is the path or route name being worked on.
///
/// # Examples
///
/// ```
/// use trackway_core::logging::routing_span;
///
/// let span = routing_span("recognize", "blog/2004/12/25");
/// let _guard = span.enter();
/// tracing::debug!("scanning route table");
/// ```
pub fn routing_span(operation: &'static str, target: &str) -> tracing::Span {
    tracing::debug_span!("routing", op = operation, target = target)
}
