use super::ConfigError;
use std::path::PathBuf;

/// Parses `name` into `target` when it is set. An unset variable leaves the default alone;
/// a value that does not parse is a [`ConfigError::EnvError`] naming the variable.
pub fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(name) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

pub fn load_env_string(name: &str, target: &mut String) {
    if let Ok(raw) = std::env::var(name) {
        *target = raw;
    }
}

pub fn load_env_path_opt(name: &str, target: &mut Option<PathBuf>) {
    if let Ok(raw) = std::env::var(name) {
        *target = Some(PathBuf::from(raw));
    }
}

/// Loads a flag the way the CLI reads it: `0`, `false`, `no`, `off`, `n`, `f` and the empty
/// string are false, anything else is true.
pub fn load_env_flag(name: &str, target: &mut bool) {
    if let Ok(raw) = std::env::var(name) {
        let raw = raw.trim().to_ascii_lowercase();
        *target = !matches!(raw.as_str(), "" | "0" | "false" | "no" | "off" | "n" | "f");
    }
}
