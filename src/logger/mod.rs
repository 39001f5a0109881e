//! Level filtering and emission.

pub mod clock;
pub mod sink;

pub use clock::{Clock, FixedClock, SystemClock};
pub use sink::{MemorySink, Sink, StdoutSink, WriterSink};

use crate::domain::{Level, LogRecord, LoggerError, Value, should_emit};
use crate::normalize::{DEFAULT_DEPTH_LIMIT, Normalizer};
use crate::render::{HumanRenderer, MachineRenderer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Settings fixed for the lifetime of a [`Logger`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Least severe level that is still emitted.
    pub level: String,
    /// Emit the human-readable rendition instead of JSON.
    pub dev_mode: bool,
    /// ANSI styling in dev mode.
    pub colors: bool,
    /// Path prefix shortened to `.` in dev mode. Defaults to the working directory.
    pub cwd: Option<PathBuf>,
    /// Composite nesting past which data is replaced by `[...]`.
    pub depth_limit: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Level::Debug.as_str().to_string(),
            dev_mode: false,
            colors: true,
            cwd: None,
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

pub struct Logger {
    level: Level,
    dev_mode: bool,
    machine: MachineRenderer,
    human: HumanRenderer,
    clock: Box<dyn Clock>,
    sink: Mutex<Box<dyn Sink>>,
}

macro_rules! level_methods {
    ($($(#[$doc:meta])* $name:ident => $level:path;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(&self, message: &str, data: Option<&Value>) {
                self.log($level, message, data);
            }
        )*
    };
}

impl Logger {
    /// Fails with [`LoggerError::InvalidLevel`] when `config.level` is not a known level.
    pub fn new(config: LoggerConfig) -> Result<Self, LoggerError> {
        let level: Level = config.level.parse()?;
        let cwd = config
            .cwd
            .or_else(|| std::env::current_dir().ok())
            .map(|path| path.to_string_lossy().into_owned());

        tracing::debug!(
            %level,
            dev_mode = config.dev_mode,
            depth_limit = config.depth_limit,
            "logger configured"
        );

        Ok(Self {
            level,
            dev_mode: config.dev_mode,
            machine: MachineRenderer::new(
                Normalizer::new().with_depth_limit(config.depth_limit),
            ),
            human: HumanRenderer::new(config.colors, cwd),
            clock: Box::new(SystemClock),
            sink: Mutex::new(Box::new(StdoutSink)),
        })
    }

    pub fn with_sink(mut self, sink: impl Sink + 'static) -> Self {
        self.sink = Mutex::new(Box::new(sink));
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.machine = MachineRenderer::new(normalizer);
        self
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }

    pub fn enabled(&self, level: Level) -> bool {
        should_emit(level, self.level)
    }

    /// Emits one record. Never fails: render and sink errors are reported through `tracing`.
    pub fn log(&self, level: Level, message: &str, data: Option<&Value>) {
        if let Err(e) = self.try_log(level, message, data) {
            tracing::warn!(error = %e, %level, "dropped log record");
        }
    }

    /// Same as [`Logger::log`] but hands render and sink errors back to the caller.
    pub fn try_log(
        &self,
        level: Level,
        message: &str,
        data: Option<&Value>,
    ) -> Result<(), LoggerError> {
        if !self.enabled(level) {
            return Ok(());
        }

        let record = LogRecord::assemble(level, message, data, self.clock.as_ref());
        let mut line = self.format(&record)?;
        line.push('\n');

        // One write per record; the lock keeps concurrent lines whole.
        self.sink.lock().write_line(line.as_bytes())?;
        Ok(())
    }

    /// Renders a record the way it would be emitted, without the trailing newline.
    ///
    /// In dev mode a record the human renderer cannot handle is emitted as its machine line.
    pub fn format(&self, record: &LogRecord<'_>) -> Result<String, LoggerError> {
        let line = self.machine.render(record)?;
        if !self.dev_mode {
            return Ok(line);
        }
        match self.human.render(&line) {
            Ok(human) => Ok(human),
            Err(e) => {
                tracing::warn!(error = %e, "human rendering failed, emitting machine line");
                Ok(line)
            }
        }
    }

    level_methods! {
        /// Logs at EMERG.
        emerg => Level::Emerg;
        /// Logs at ALERT.
        alert => Level::Alert;
        /// Logs at CRIT.
        crit => Level::Crit;
        /// Logs at ERROR.
        error => Level::Error;
        /// Logs at WARN.
        warn => Level::Warn;
        /// Logs at NOTICE.
        notice => Level::Notice;
        /// Logs at INFO.
        info => Level::Info;
        /// Logs at DEBUG.
        debug => Level::Debug;
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            dev_mode: false,
            machine: MachineRenderer::default(),
            human: HumanRenderer::new(true, None),
            clock: Box::new(SystemClock),
            sink: Mutex::new(Box::new(StdoutSink)),
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("dev_mode", &self.dev_mode)
            .field("human", &self.human)
            .finish_non_exhaustive()
    }
}
