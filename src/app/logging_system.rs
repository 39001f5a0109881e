use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter for the binary's own diagnostics when `RUST_LOG` is unset.
pub const DEFAULT_DIAGNOSTICS_FILTER: &str = "warn";

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Logging initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Builds the diagnostics filter: `RUST_LOG` when set and valid, `default_filter` otherwise.
pub fn build_env_filter(default_filter: &str) -> Result<EnvFilter, InitializationError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(default_filter).map_err(|e| InitializationError::LoggingInitFailed {
        details: format!("Failed to create EnvFilter with '{default_filter}'"),
        source: Box::new(e),
    })
}

/// Installs the global `tracing` subscriber for diagnostics on stderr.
///
/// Records go to stdout through the logger's sink, so the two never mix. Safe to call more
/// than once; only the first call installs anything.
pub fn setup_logging(default_filter: &str) -> Result<(), InitializationError> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    let result = INIT.get_or_init(|| {
        let env_filter = build_env_filter(default_filter).map_err(|e| e.to_string())?;
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .compact(),
            )
            .try_init()
            .map_err(|e| e.to_string())
    });

    result
        .clone()
        .map_err(|details| InitializationError::LoggingInitFailed {
            details: details.clone(),
            source: Box::new(std::io::Error::other(details)),
        })
}
