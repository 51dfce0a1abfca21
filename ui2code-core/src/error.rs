use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Failure of the model call for one item.
///
/// Client crates wrap their own error type in [`GenerationError::Request`] so
/// the pipeline can record the message without knowing the transport.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    Request(Box<dyn std::error::Error + Send + Sync>),

    #[error("model returned no message content")]
    EmptyResponse,
}

impl GenerationError {
    pub fn request<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        GenerationError::Request(Box::new(err))
    }
}

/// Failure of the external component renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("renderer command is empty")]
    NotConfigured,

    #[error("renderer executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("renderer exited with {}: {stderr}", exit_label(.code))]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("renderer timed out after {0:?}")]
    Timeout(Duration),

    #[error("could not prepare output directory {}: {message}", .path.display())]
    OutputDir { path: PathBuf, message: String },

    #[error("renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}
