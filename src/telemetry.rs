//! Tracing initialisation for the hook binary.
//!
//! Call [`init_tracing`] once at program start. Logs go to stderr so they
//! reach the pushing client alongside the delivery report.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Respects `RUST_LOG`; falls back to `level` when it is unset or invalid.
/// Only the first call takes effect.
pub fn init_tracing(level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()
        .ok();
}

/// Map the CLI verbosity flags to a default level.
pub fn level_for(quiet: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_from_flags() {
        assert_eq!(level_for(false, true), Level::DEBUG);
        assert_eq!(level_for(true, false), Level::ERROR);
        assert_eq!(level_for(false, false), Level::WARN);
    }

    #[test]
    fn init_twice_is_harmless() {
        init_tracing(Level::WARN);
        init_tracing(Level::DEBUG);
    }
}
