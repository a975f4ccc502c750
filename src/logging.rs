//! Tracing setup shared by both binaries.
//!
//! Diagnostics go to stderr so stdout carries nothing but instrument data.

use crate::config::{LogFormat, LoggingConfig};
use tracing::debug;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level; an unparsable level falls back
/// to `info`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Pretty => builder.pretty().finish().try_init()?,
        LogFormat::Compact => builder.compact().finish().try_init()?,
    }

    debug!("Logging initialized with level: {}", config.level);
    Ok(())
}
