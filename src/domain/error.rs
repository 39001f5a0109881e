use thiserror::Error;

/// Top-level error type for the logger.
#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log level '{0}'")]
    InvalidLevel(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}
