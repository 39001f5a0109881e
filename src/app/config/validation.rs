use super::{Config, ConfigError};
use crate::domain::Level;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Configured floor must be one of the known levels
        self.level.parse::<Level>()?;

        if self.depth_limit == 0 {
            return Err(ConfigError::InvalidConfig(
                "depth_limit must be greater than 0".to_string(),
            ));
        }

        // Payload must be well-formed JSON
        if let Some(data) = &self.data {
            serde_json::from_str::<serde_json::Value>(data).map_err(|e| {
                ConfigError::InvalidConfig(format!("Invalid --data JSON '{data}': {e}"))
            })?;
        }

        Ok(())
    }
}
