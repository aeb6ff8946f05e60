//! Error types for the `quizforge-model` crate.

use thiserror::Error;

/// Errors that can occur when calling an LLM backend.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No API key was provided or found in the environment.
    #[error("missing API key: {0}")]
    MissingApiKey(String),

    /// The HTTP request could not be completed.
    #[error("request failed: {0}")]
    Request(String),

    /// The call exceeded its bounded wait.
    #[error("request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout in seconds.
        seconds: u64,
    },

    /// The backend returned a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The error detail reported by the backend.
        message: String,
    },

    /// The backend returned a response with no usable candidate text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

/// A convenience result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
