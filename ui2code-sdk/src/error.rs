//! SDK error types and handling
//!
//! Errors are kept distinguishable so callers can tell transport failures,
//! API rejections and empty completions apart.

use thiserror::Error;

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum SdkError {
    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError {
        status: u16,
        message: String,
        error_type: Option<String>,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Server error
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// The completion carried no choices or no message content
    #[error("Model response contained no message content")]
    EmptyResponse,
}

/// Result type alias for SDK operations
pub type SdkResult<T> = Result<T, SdkError>;

/// `{"error": {"message": ..., "type": ...}}` body returned on failure
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl SdkError {
    /// Create an API error from a response
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, error_type) = match serde_json::from_str::<ApiErrorResponse>(body) {
            Ok(parsed) => (parsed.error.message, parsed.error.error_type),
            Err(_) => (body.to_string(), None),
        };

        match status {
            401 => SdkError::AuthenticationError(message),
            429 => SdkError::RateLimited { retry_after: 60 },
            500..=599 => SdkError::ServerError { status, message },
            _ => SdkError::ApiError {
                status,
                message,
                error_type,
            },
        }
    }

    /// Check if the error is retryable.
    ///
    /// Transport errors count only when the request never got a response.
    pub fn is_retryable(&self) -> bool {
        match self {
            SdkError::NetworkError(e) => e.is_connect() || e.is_request() || e.is_timeout(),
            SdkError::Timeout | SdkError::RateLimited { .. } | SdkError::ServerError { .. } => {
                true
            }
            _ => false,
        }
    }
}
