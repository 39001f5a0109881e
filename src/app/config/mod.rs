mod cli;
pub mod serde_helpers;
mod validation;

use crate::domain::LoggerError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
    #[error(transparent)]
    Logger(#[from] LoggerError),
}

pub use cli::{APP_ENV_DEVELOPMENT, Config, DEFAULT_LEVEL};
