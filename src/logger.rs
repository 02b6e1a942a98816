pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, format::FmtSpan}};

/// Installs the global subscriber: `RUST_LOG` filter (default `info`), uptime
/// timestamps, span close timings when debugging.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let is_debug = wants_span_timings(&env_filter.to_string())
        || wants_span_timings(&std::env::var("RUST_LOG").unwrap_or_default());

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

fn wants_span_timings(filter: &str) -> bool {
    filter.contains("debug") || filter.contains("trace")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_timings_follow_level() {
        assert!(wants_span_timings("region_fx=debug"));
        assert!(wants_span_timings("trace"));
        assert!(!wants_span_timings("info"));
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init();
        init();
    }
}
