//! The LLM capability interface.
//!
//! The pipeline consumes language models through this trait rather than a
//! concrete client, so every stage is testable with a deterministic fake.
//! Model output is untrusted: callers validate and repair the returned text
//! against their own schema.

use async_trait::async_trait;

use crate::error::Result;

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// Optional system instruction framing the task.
    pub system: Option<String>,
    /// The user prompt.
    pub user: String,
    /// Sampling temperature; backend default when `None`.
    pub temperature: Option<f32>,
    /// Ask the backend for a JSON response where supported.
    pub json_output: bool,
}

impl LlmRequest {
    /// Create a request with just a user prompt.
    pub fn new(user: impl Into<String>) -> Self {
        Self { system: None, user: user.into(), temperature: None, json_output: false }
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Request JSON output from backends that support it.
    pub fn expect_json(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// A completion response: raw text, to be validated by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    /// The model's text output.
    pub text: String,
}

/// A large-language-model backend.
///
/// Implementations carry their own bounded request timeout; on timeout the
/// call fails like any other unavailability and the caller's retry policy
/// applies. Determinism is not guaranteed; the contract covers delivery,
/// not content.
#[async_trait]
pub trait Llm: Send + Sync {
    /// The backend's model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Run one completion request to a finished response.
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;
}
