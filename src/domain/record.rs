use super::level::Level;
use super::value::Value;
use crate::logger::Clock;
use chrono::{DateTime, SecondsFormat, Utc};

/// A single log call, assembled synchronously and consumed by the renderers.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: &'a str,
    pub data: Option<&'a Value>,
}

impl<'a> LogRecord<'a> {
    pub fn assemble(
        level: Level,
        message: &'a str,
        data: Option<&'a Value>,
        clock: &dyn Clock,
    ) -> Self {
        Self {
            level,
            time: clock.now(),
            message,
            data,
        }
    }

    /// `YYYY-MM-DDTHH:mm:ss.sssZ`
    pub fn timestamp(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
