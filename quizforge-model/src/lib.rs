//! # quizforge-model
//!
//! The LLM capability interface for QuizForge and its implementations:
//!
//! - [`Llm`]: the request/response contract every backend implements
//! - [`GeminiClient`]: Google Gemini over the `generateContent` REST API
//! - [`MockLlm`]: scripted responses for deterministic tests
//!
//! Backends carry a bounded per-request timeout; their output is untrusted
//! text that callers validate against their own schema.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use quizforge_model::{GeminiClient, Llm, LlmRequest};
//!
//! let client = GeminiClient::from_env()?;
//! let response = client
//!     .complete(LlmRequest::new("Summarize ownership in Rust").with_temperature(0.7))
//!     .await?;
//! println!("{}", response.text);
//! ```

pub mod error;
pub mod gemini;
pub mod llm;
pub mod mock;

pub use error::{ModelError, Result};
pub use gemini::GeminiClient;
pub use llm::{Llm, LlmRequest, LlmResponse};
pub use mock::MockLlm;
