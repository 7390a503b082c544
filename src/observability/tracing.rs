//! Subscriber setup for `tracing` and `log` output.
//!
//! Logs go to stderr so JSON reports on stdout stay parseable. `RUST_LOG`
//! wins over the `-v` count when set.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` repetition count
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("layermap={}", level_for_verbosity(verbosity))))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_tracing(verbosity: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .without_time()
        .compact()
        .try_init();

    if installed.is_ok() {
        tracing::debug!(verbosity, "Tracing initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(3), "trace");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_tracing(0);
        init_tracing(2);
    }
}
