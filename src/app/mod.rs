pub mod config;
pub mod logging_system;

pub use config::{Config, ConfigError};
pub use logging_system::{InitializationError, setup_logging};

use crate::logger::{Logger, Sink, StdoutSink};
use anyhow::Context;
use logging_system::DEFAULT_DIAGNOSTICS_FILTER;
use tracing::debug;

/// Emits the single record described by `config` into `sink`.
pub fn run(config: &Config, sink: impl Sink + 'static) -> anyhow::Result<()> {
    let level = config
        .record_level
        .context("missing record level (one of emerg, alert, crit, error, warn, notice, info, debug)")?;
    let message = config.message.as_deref().context("missing message")?;
    let data = config.parsed_data()?;

    let logger = Logger::new(config.logger_config())?.with_sink(sink);
    debug!(%level, emitted = logger.enabled(level), "emitting record");

    logger.try_log(level, message, data.as_ref())?;
    Ok(())
}

pub fn main() -> anyhow::Result<()> {
    setup_logging(DEFAULT_DIAGNOSTICS_FILTER)?;
    let config = Config::from_args_and_env(std::env::args_os())?;
    run(&config, StdoutSink)
}
