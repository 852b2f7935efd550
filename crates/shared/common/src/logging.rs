//! Tracing subscriber setup.
//!
//! Binaries call [`init`] once at startup. Library code only uses the
//! `tracing` macros and never holds a logger of its own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber.
///
/// `verbose` forces `debug`; otherwise `RUST_LOG` wins over `config.level`.
/// Returns an error if a subscriber was already installed.
pub fn init(
    config: &LoggingConfig,
    verbose: bool,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
    };

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false),
            )
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
}
