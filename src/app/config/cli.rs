use super::ConfigError;
use super::serde_helpers::{load_env_flag, load_env_path_opt, load_env_string, load_env_var};
use crate::domain::{Level, Value};
use crate::logger::LoggerConfig;
use crate::normalize::DEFAULT_DEPTH_LIMIT;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser};
use clap::builder::FalseyValueParser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_LEVEL: &str = "debug";

/// `APP_ENV` value that turns on dev mode.
pub const APP_ENV_DEVELOPMENT: &str = "development";

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about = "Emit one structured log record", long_about = None)]
#[serde(default)]
pub struct Config {
    /// Least severe level that is still emitted
    #[arg(long, env = "LOG_LEVEL", default_value = DEFAULT_LEVEL)]
    pub level: String,

    /// Human-readable output instead of JSON
    #[arg(long, env = "DEV_MODE", value_parser = FalseyValueParser::new())]
    pub dev_mode: bool,

    /// Disable ANSI styling in dev mode
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Composite nesting past which data is replaced by `[...]`
    #[arg(long, env = "LOG_DEPTH_LIMIT", default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: usize,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// JSON payload attached to the record
    #[serde(skip)]
    #[arg(long)]
    pub data: Option<String>,

    /// Level of the emitted record
    #[serde(skip)]
    #[arg(value_enum)]
    pub record_level: Option<Level>,

    /// Message of the emitted record
    #[serde(skip)]
    pub message: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_string(),
            dev_mode: false,
            no_color: false,
            depth_limit: DEFAULT_DEPTH_LIMIT,
            config_file: None,
            data: None,
            record_level: None,
            message: None,
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        load_env_string("LOG_LEVEL", &mut config.level);
        load_env_flag("DEV_MODE", &mut config.dev_mode);
        load_env_flag("NO_COLOR", &mut config.no_color);
        load_env_var("LOG_DEPTH_LIMIT", &mut config.depth_limit)?;
        load_env_path_opt("CONFIG_FILE", &mut config.config_file);
        config.apply_app_env();

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// CLI arguments and their env fallbacks win, then `APP_ENV`, then the config file, then
    /// the defaults.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = Config::command()
            .try_get_matches_from(args)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        let mut config = Config::from_arg_matches(&matches)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        let unset = |id: &str| {
            matches!(
                matches.value_source(id),
                None | Some(ValueSource::DefaultValue)
            )
        };

        if let Some(file) = config.config_file.as_deref().map(Config::from_file).transpose()? {
            if unset("level") {
                config.level = file.level;
            }
            if unset("dev_mode") {
                config.dev_mode = file.dev_mode;
            }
            if unset("no_color") {
                config.no_color = file.no_color;
            }
            if unset("depth_limit") {
                config.depth_limit = file.depth_limit;
            }
        }
        if unset("dev_mode") {
            config.apply_app_env();
        }

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        self.level = self.level.trim().to_ascii_lowercase();
        Ok(())
    }

    /// The core never reads the environment; the application decides dev mode here.
    fn apply_app_env(&mut self) {
        if std::env::var("APP_ENV").is_ok_and(|env| env == APP_ENV_DEVELOPMENT) {
            self.dev_mode = true;
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            level: self.level.clone(),
            dev_mode: self.dev_mode,
            colors: !self.no_color,
            cwd: None,
            depth_limit: self.depth_limit,
        }
    }

    /// Parsed `--data` payload.
    pub fn parsed_data(&self) -> Result<Option<Value>, ConfigError> {
        self.data
            .as_deref()
            .map(|raw| {
                serde_json::from_str::<serde_json::Value>(raw)
                    .map(Value::from)
                    .map_err(|e| ConfigError::InvalidConfig(format!("Invalid --data JSON: {e}")))
            })
            .transpose()
    }
}
