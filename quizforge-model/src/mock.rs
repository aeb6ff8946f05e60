//! Scripted mock LLM for deterministic tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ModelError, Result};
use crate::llm::{Llm, LlmRequest, LlmResponse};

/// One scripted reply.
#[derive(Debug, Clone)]
enum Script {
    Text(String),
    Error(String),
}

/// An [`Llm`] that replays scripted responses in FIFO order.
///
/// When the script runs out, the fallback response (set with
/// [`MockLlm::always`]) is returned; without one the call fails. Received
/// requests are recorded for assertions.
///
/// # Example
///
/// ```rust,ignore
/// use quizforge_model::{MockLlm, Llm, LlmRequest};
///
/// let llm = MockLlm::new().push_text("first reply").always("fallback");
/// let first = llm.complete(LlmRequest::new("hi")).await?;
/// assert_eq!(first.text, "first reply");
/// ```
#[derive(Debug, Default)]
pub struct MockLlm {
    script: Mutex<VecDeque<Script>>,
    fallback: Option<String>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text response.
    pub fn push_text(self, text: impl Into<String>) -> Self {
        self.script.lock().expect("mock script lock").push_back(Script::Text(text.into()));
        self
    }

    /// Queue a failure.
    pub fn push_error(self, message: impl Into<String>) -> Self {
        self.script.lock().expect("mock script lock").push_back(Script::Error(message.into()));
        self
    }

    /// Set the fallback returned once the script is exhausted.
    pub fn always(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().expect("mock request lock").clone()
    }

    /// Number of completion calls made against this mock.
    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("mock request lock").len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.requests.lock().expect("mock request lock").push(request);

        let next = self.script.lock().expect("mock script lock").pop_front();
        match next {
            Some(Script::Text(text)) => Ok(LlmResponse { text }),
            Some(Script::Error(message)) => Err(ModelError::Request(message)),
            None => match &self.fallback {
                Some(text) => Ok(LlmResponse { text: text.clone() }),
                None => Err(ModelError::EmptyResponse),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_in_order_then_falls_back() {
        let llm = MockLlm::new().push_text("one").push_error("boom").always("rest");

        assert_eq!(llm.complete(LlmRequest::new("a")).await.unwrap().text, "one");
        assert!(llm.complete(LlmRequest::new("b")).await.is_err());
        assert_eq!(llm.complete(LlmRequest::new("c")).await.unwrap().text, "rest");
        assert_eq!(llm.call_count(), 3);
    }

    #[tokio::test]
    async fn exhausted_script_without_fallback_errors() {
        let llm = MockLlm::new();
        let err = llm.complete(LlmRequest::new("a")).await.unwrap_err();
        assert!(matches!(err, ModelError::EmptyResponse));
    }

    #[tokio::test]
    async fn records_received_requests() {
        let llm = MockLlm::new().always("ok");
        llm.complete(LlmRequest::new("prompt").with_temperature(0.2)).await.unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user, "prompt");
        assert_eq!(requests[0].temperature, Some(0.2));
    }
}
