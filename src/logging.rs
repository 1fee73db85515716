//! Tracing setup for the command-line tool.
//!
//! Everything is written to standard error so standard output stays valid JSON.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "cmdjson=debug"
    } else {
        "cmdjson=warn"
    }
}

/// Initialise the tracing subscriber. Repeated calls are ignored.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .with_target(false)
        .without_time()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
        assert_eq!(default_filter(true), "cmdjson=debug");
    }
}
