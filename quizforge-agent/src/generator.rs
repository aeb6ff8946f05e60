//! The Generator agent: retrieved chunks in, candidate MCQs out.
//!
//! A pure request/response transformation over explicit inputs, with no
//! hidden state between calls.

use std::sync::Arc;

use tracing::{info, warn};

use quizforge_model::{Llm, LlmRequest};
use quizforge_rag::Chunk;

use crate::error::{AgentError, Result};
use crate::parse::extract_json_payload;
use crate::question::CandidateQuestion;

const SYSTEM_PROMPT: &str = "You are an expert educational content creator. \
Generate high-quality multiple choice questions grounded strictly in the \
provided content.\n\n\
Respond with ONLY a JSON array, no markdown and no surrounding text:\n\
[\n  {\n    \"question\": \"Question text?\",\n    \"options\": {\"A\": \"...\", \"B\": \"...\", \"C\": \"...\", \"D\": \"...\"},\n    \"correct_answer\": \"A\",\n    \"explanation\": \"Why this is correct, citing the source document\"\n  }\n]";

const STRICT_RETRY_NOTE: &str = "\n\nCRITICAL: the previous response was not \
valid. Return ONLY the raw JSON array. No code fences, no commentary, no \
text before or after the array.";

/// Generates a fixed-size batch of candidate questions from retrieved chunks.
pub struct Generator {
    llm: Arc<dyn Llm>,
    temperature: f32,
    max_context_chars: usize,
}

impl Generator {
    /// Create a generator over the given LLM backend.
    pub fn new(llm: Arc<dyn Llm>, temperature: f32, max_context_chars: usize) -> Self {
        Self { llm, temperature, max_context_chars }
    }

    /// Generate exactly `target_count` candidate questions grounded in
    /// `chunks`.
    ///
    /// One LLM call, retried once with a stricter formatting instruction if
    /// the output cannot be parsed into the expected structure. Partial
    /// output is never fabricated: a second failure is
    /// [`AgentError::GenerationFormat`], and a transport failure on the
    /// retry propagates as [`AgentError::Model`].
    pub async fn generate(
        &self,
        query: &str,
        chunks: &[Chunk],
        target_count: usize,
    ) -> Result<Vec<CandidateQuestion>> {
        if target_count == 0 {
            return Err(AgentError::Validation("target_count must be at least 1".to_string()));
        }
        if chunks.is_empty() {
            return Err(AgentError::NoRelevantChunks);
        }

        let context = grounding_context(chunks, self.max_context_chars);
        let user_prompt = format!(
            "Generate {target_count} MCQ questions about: {query}\n\nCONTENT:\n{context}\n\n\
             Return ONLY a valid JSON array of exactly {target_count} questions."
        );

        match self.attempt(&user_prompt, SYSTEM_PROMPT, target_count).await {
            Ok(candidates) => Ok(candidates),
            Err(first_failure) => {
                warn!(error = %first_failure, "generation attempt failed, retrying strictly");
                let strict_system = format!("{SYSTEM_PROMPT}{STRICT_RETRY_NOTE}");
                self.attempt(&user_prompt, &strict_system, target_count).await.map_err(|e| {
                    match e {
                        AgentError::Model(transport) => AgentError::Model(transport),
                        other => AgentError::GenerationFormat { reason: other.to_string() },
                    }
                })
            }
        }
    }

    /// One generation call: complete, repair, parse, validate.
    async fn attempt(
        &self,
        user_prompt: &str,
        system_prompt: &str,
        target_count: usize,
    ) -> Result<Vec<CandidateQuestion>> {
        let request = LlmRequest::new(user_prompt)
            .with_system(system_prompt)
            .with_temperature(self.temperature)
            .expect_json();

        let response = self.llm.complete(request).await?;
        let payload = extract_json_payload(&response.text);

        let candidates: Vec<CandidateQuestion> =
            serde_json::from_str(payload).map_err(|e| AgentError::GenerationFormat {
                reason: format!("invalid JSON: {e}"),
            })?;

        if candidates.len() != target_count {
            return Err(AgentError::GenerationFormat {
                reason: format!("expected {target_count} questions, got {}", candidates.len()),
            });
        }
        for (i, candidate) in candidates.iter().enumerate() {
            candidate.validate().map_err(|reason| AgentError::GenerationFormat {
                reason: format!("question {i}: {reason}"),
            })?;
        }

        info!(count = candidates.len(), model = self.llm.model_name(), "generated candidates");
        Ok(candidates)
    }
}

/// Concatenate chunks in retrieval order, each tagged with its source, so
/// explanations can cite "Document N". Truncated to the context budget on a
/// character boundary.
fn grounding_context(chunks: &[Chunk], max_chars: usize) -> String {
    let mut context = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if !context.is_empty() {
            context.push_str("\n\n");
        }
        context.push_str(&format!("Document {} (page {}):\n{}", i + 1, chunk.page, chunk.text));
    }

    if context.chars().count() > max_chars {
        context = context.chars().take(max_chars).collect();
    }
    context
}
