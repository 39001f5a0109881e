use crate::domain::{LogRecord, RenderError};
use crate::normalize::Normalizer;
use serde::{Deserialize, Serialize};

/// Wire shape of a record. Field order is the key order on the wire.
#[derive(Debug, Serialize, Deserialize)]
pub struct CanonicalLine {
    pub level: String,
    pub time: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Renders records as single-line JSON. This is the only path through which data is normalized.
#[derive(Debug, Clone, Copy, Default)]
pub struct MachineRenderer {
    normalizer: Normalizer,
}

impl MachineRenderer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn render(&self, record: &LogRecord<'_>) -> Result<String, RenderError> {
        let line = CanonicalLine {
            level: record.level.as_upper().to_string(),
            time: record.timestamp(),
            message: record.message.to_string(),
            data: record.data.and_then(|data| self.normalizer.normalize(data)),
        };
        Ok(serde_json::to_string(&line)?)
    }
}
