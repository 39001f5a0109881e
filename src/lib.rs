#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_possible_truncation, // Integral floats are range-checked before the cast
    clippy::cast_possible_wrap,       // Pointer addresses used only as identities
    clippy::cast_precision_loss,      // Number comparison for map/set keys
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. LoggerConfig in logger module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod domain;
pub mod logger;
pub mod normalize;
pub mod render;

// Re-export main types for easy access
pub use domain::{ErrorValue, Level, LoggerError, Value};
pub use logger::{Logger, LoggerConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
