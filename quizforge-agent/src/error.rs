//! Error types for the `quizforge-agent` crate.

use thiserror::Error;

use crate::workflow::Stage;

/// Errors that can occur in the question generation workflow.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Generator output could not be parsed after its one retry.
    #[error("generation output could not be parsed: {reason}")]
    GenerationFormat {
        /// The raw failure reason, including parse detail.
        reason: String,
    },

    /// Total loss of connectivity to the evaluation capability.
    ///
    /// Individual evaluation failures never raise this; they degrade to a
    /// minimum-score fallback instead.
    #[error("evaluation capability unreachable: {message}")]
    EvaluatorUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// Retrieval produced no chunks to ground generation on.
    #[error("no relevant chunks found; ingest a document first")]
    NoRelevantChunks,

    /// Malformed input rejected before any external call.
    #[error("validation error: {0}")]
    Validation(String),

    /// An error from the retrieval pipeline.
    #[error(transparent)]
    Rag(#[from] quizforge_rag::RagError),

    /// An error from the LLM backend.
    #[error(transparent)]
    Model(#[from] quizforge_model::ModelError),
}

/// A convenience result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// The absorbing `Failed` payload: which stage died, and why.
#[derive(Debug, Error)]
#[error("workflow failed during {stage}: {error}")]
pub struct WorkflowFailure {
    /// The stage that was executing when the failure occurred.
    pub stage: Stage,
    /// The underlying error.
    pub error: AgentError,
}
