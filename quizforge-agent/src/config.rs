//! Configuration for the question generation workflow.

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};

/// Tunable policy for the Generator → Evaluator → Finalizer workflow.
///
/// Target count and approval threshold are configuration, not hardcoded
/// policy; the defaults match the observed production behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Number of candidate questions requested per run.
    pub target_count: usize,
    /// Minimum quality score (1–10) for a question to be approved.
    pub approval_threshold: u8,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// Maximum characters of grounding context passed to the model.
    pub max_context_chars: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self { target_count: 5, approval_threshold: 6, temperature: 0.7, max_context_chars: 3000 }
    }
}

impl AgentConfig {
    /// Create a new builder for constructing an [`AgentConfig`].
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`AgentConfig`].
#[derive(Debug, Clone, Default)]
pub struct AgentConfigBuilder {
    config: AgentConfig,
}

impl AgentConfigBuilder {
    /// Set the number of candidate questions requested per run.
    pub fn target_count(mut self, count: usize) -> Self {
        self.config.target_count = count;
        self
    }

    /// Set the minimum quality score for approval.
    pub fn approval_threshold(mut self, threshold: u8) -> Self {
        self.config.approval_threshold = threshold;
        self
    }

    /// Set the sampling temperature for generation.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Set the grounding context budget in characters.
    pub fn max_context_chars(mut self, chars: usize) -> Self {
        self.config.max_context_chars = chars;
        self
    }

    /// Build the [`AgentConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Validation`] if `target_count == 0`, the
    /// threshold is outside 1–10, or the context budget is zero.
    pub fn build(self) -> Result<AgentConfig> {
        if self.config.target_count == 0 {
            return Err(AgentError::Validation(
                "target_count must be at least 1".to_string(),
            ));
        }
        if !(1..=10).contains(&self.config.approval_threshold) {
            return Err(AgentError::Validation(format!(
                "approval_threshold must be within 1..=10, got {}",
                self.config.approval_threshold
            )));
        }
        if self.config.max_context_chars == 0 {
            return Err(AgentError::Validation(
                "max_context_chars must be at least 1".to_string(),
            ));
        }
        Ok(self.config)
    }
}
