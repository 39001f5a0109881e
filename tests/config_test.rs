use rask_logger::app::{Config, ConfigError};
use rask_logger::{Level, LoggerError};
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

// Helper function to clean all environment variables before and after tests
fn clean_all_env_vars() {
    let env_vars = [
        "LOG_LEVEL",
        "DEV_MODE",
        "NO_COLOR",
        "LOG_DEPTH_LIMIT",
        "CONFIG_FILE",
        "APP_ENV",
    ];

    unsafe {
        for var in &env_vars {
            env::remove_var(var);
        }
    }
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_defaults() {
    clean_all_env_vars();

    let config = Config::from_args(["rask-logger"]).unwrap();
    assert_eq!(config.level, "debug");
    assert!(!config.dev_mode);
    assert!(!config.no_color);
    assert_eq!(config.depth_limit, 256);
    assert!(config.record_level.is_none());
    assert!(config.message.is_none());
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();

    let config = Config::from_args([
        "rask-logger",
        "--level",
        "Notice",
        "--dev-mode",
        "--no-color",
        "--depth-limit",
        "16",
        "--data",
        r#"{"user":"alice"}"#,
        "crit",
        "database unreachable",
    ])
    .unwrap();

    assert_eq!(config.level, "notice");
    assert!(config.dev_mode);
    assert!(config.no_color);
    assert_eq!(config.depth_limit, 16);
    assert_eq!(config.record_level, Some(Level::Crit));
    assert_eq!(config.message.as_deref(), Some("database unreachable"));
    assert!(config.parsed_data().unwrap().is_some());
}

#[test]
#[serial]
fn test_config_from_environment() {
    clean_all_env_vars();
    unsafe {
        env::set_var("LOG_LEVEL", "warn");
        env::set_var("DEV_MODE", "true");
        env::set_var("NO_COLOR", "1");
        env::set_var("LOG_DEPTH_LIMIT", "64");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.level, "warn");
    assert!(config.dev_mode);
    assert!(config.no_color);
    assert_eq!(config.depth_limit, 64);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_cli_reads_environment_fallbacks() {
    clean_all_env_vars();
    unsafe {
        env::set_var("LOG_LEVEL", "ERROR");
        env::set_var("NO_COLOR", "1");
        env::set_var("DEV_MODE", "0");
    }

    let config = Config::from_args(["rask-logger", "info", "hello"]).unwrap();
    assert_eq!(config.level, "error");
    assert!(config.no_color);
    assert!(!config.dev_mode);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_app_env_development_enables_dev_mode() {
    clean_all_env_vars();
    unsafe {
        env::set_var("APP_ENV", "development");
    }

    assert!(Config::from_env().unwrap().dev_mode);
    assert!(
        Config::from_args_and_env(["rask-logger", "info", "hello"])
            .unwrap()
            .dev_mode
    );

    unsafe {
        env::set_var("APP_ENV", "production");
    }
    assert!(!Config::from_env().unwrap().dev_mode);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_invalid_level_is_rejected() {
    clean_all_env_vars();

    let err = Config::from_args(["rask-logger", "--level", "derp"]).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Logger(LoggerError::InvalidLevel(ref name)) if name == "derp"
    ));
    assert_eq!(err.to_string(), "Invalid log level 'derp'");
}

#[test]
#[serial]
fn test_invalid_environment_value() {
    clean_all_env_vars();
    unsafe {
        env::set_var("LOG_DEPTH_LIMIT", "deep");
    }

    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::EnvError(ref msg) if msg.contains("LOG_DEPTH_LIMIT")));

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_zero_depth_limit_is_rejected() {
    clean_all_env_vars();

    let err = Config::from_args(["rask-logger", "--depth-limit", "0"]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig(_)));
}

#[test]
#[serial]
fn test_malformed_data_is_rejected() {
    clean_all_env_vars();

    let err = Config::from_args(["rask-logger", "--data", "{oops", "info", "m"]).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidConfig(ref msg) if msg.contains("--data")));
}

#[test]
fn test_config_from_file() {
    let file = config_file(
        r#"
level = "INFO"
dev_mode = true
no_color = true
depth_limit = 32
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.level, "info");
    assert!(config.dev_mode);
    assert!(config.no_color);
    assert_eq!(config.depth_limit, 32);
}

#[test]
fn test_config_file_errors() {
    let err = Config::from_file("/nonexistent/rask-logger.toml").unwrap_err();
    assert!(matches!(err, ConfigError::FileError(_)));

    let file = config_file("level = [");
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));

    let file = config_file(r#"level = "loud""#);
    let err = Config::from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Logger(LoggerError::InvalidLevel(_))));
}

#[test]
#[serial]
fn test_file_fills_values_left_at_defaults() {
    clean_all_env_vars();
    let file = config_file(
        r#"
level = "notice"
no_color = true
depth_limit = 8
"#,
    );
    let path = file.path().to_string_lossy().into_owned();

    let config =
        Config::from_args_and_env(["rask-logger", "--config-file", path.as_str(), "info", "m"])
            .unwrap();
    assert_eq!(config.level, "notice");
    assert!(config.no_color);
    assert_eq!(config.depth_limit, 8);

    // Explicit arguments win over the file
    let config = Config::from_args_and_env([
        "rask-logger",
        "--config-file",
        path.as_str(),
        "--level",
        "crit",
        "info",
        "m",
    ])
    .unwrap();
    assert_eq!(config.level, "crit");
}

#[test]
fn test_logger_config_carries_settings() {
    let config = Config {
        level: "alert".to_string(),
        no_color: true,
        depth_limit: 4,
        ..Config::default()
    };
    let logger_config = config.logger_config();
    assert_eq!(logger_config.level, "alert");
    assert!(!logger_config.colors);
    assert_eq!(logger_config.depth_limit, 4);
    assert!(logger_config.cwd.is_none());
}

#[rstest]
#[case("debug")]
#[case("DEBUG")]
#[serial]
fn test_explicit_level_beats_file(#[case] level: &str) {
    clean_all_env_vars();
    let file = config_file(r#"level = "error""#);
    let path = file.path().to_string_lossy().into_owned();

    let config = Config::from_args_and_env([
        "rask-logger",
        "--level",
        level,
        "--config-file",
        path.as_str(),
        "info",
        "m",
    ])
    .unwrap();
    assert_eq!(config.level, "debug");
}

#[test]
#[serial]
fn test_environment_beats_file() {
    clean_all_env_vars();
    let file = config_file(
        r#"
level = "error"
dev_mode = true
depth_limit = 8
"#,
    );
    unsafe {
        env::set_var("LOG_LEVEL", "info");
        env::set_var("DEV_MODE", "0");
        env::set_var("CONFIG_FILE", file.path());
    }

    let config = Config::from_args_and_env(["rask-logger", "info", "m"]).unwrap();
    assert_eq!(config.level, "info");
    assert!(!config.dev_mode);
    assert_eq!(config.depth_limit, 8);

    clean_all_env_vars();
}

#[test]
#[serial]
fn test_app_env_beats_file() {
    clean_all_env_vars();
    let file = config_file("dev_mode = false");
    let path = file.path().to_string_lossy().into_owned();
    unsafe {
        env::set_var("APP_ENV", "development");
    }

    let config =
        Config::from_args_and_env(["rask-logger", "--config-file", path.as_str(), "info", "m"])
            .unwrap();
    assert!(config.dev_mode);

    clean_all_env_vars();
}
