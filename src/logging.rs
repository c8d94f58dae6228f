//! Tracing setup.
//!
//! Logs go to stderr so stdout stays clean for reports and piping.
//! `RUST_LOG` wins over the level picked from `-v` flags.

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is a no-op.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0), "info");
        assert_eq!(level_for(1), "debug");
        assert_eq!(level_for(5), "trace");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_tracing("warn");
        init_tracing("debug");
    }
}
