//! Domain layer for rask-logger.
//!
//! Contains the canonical types shared across all modules:
//! - `Level`: severity table and filter predicate
//! - `Value` / `ErrorValue`: the payload a caller attaches to a record
//! - `LogRecord`: one assembled log call
//! - `LoggerError`: top-level error type

pub mod error;
pub mod error_value;
pub mod level;
pub mod record;
pub mod value;

pub use error::{LoggerError, RenderError};
pub use error_value::ErrorValue;
pub use level::{Level, should_emit};
pub use record::LogRecord;
pub use value::{Array, Handle, Map, Object, Opaque, Value};
