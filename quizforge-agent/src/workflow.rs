//! The question generation workflow: an explicit state machine over the
//! Retrieve → Generate → Evaluate → Finalize stages.
//!
//! Each state carries the data the next stage needs, so a run can be
//! observed, logged, or resumed stage by stage. Transitions are strictly
//! forward; there are no loops or back-edges.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument, warn};

use quizforge_rag::{Chunk, RagPipeline};

use crate::config::AgentConfig;
use crate::error::{AgentError, Result, WorkflowFailure};
use crate::evaluator::{EvalOutcome, Evaluation, Evaluator};
use crate::finalizer::finalize;
use crate::generator::Generator;
use crate::question::{CandidateQuestion, EvaluatedQuestion};

/// The workflow stage names, used in failure reporting and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieving,
    Generating,
    Evaluating,
    Finalizing,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Retrieving => "retrieval",
            Stage::Generating => "generation",
            Stage::Evaluating => "evaluation",
            Stage::Finalizing => "finalization",
        };
        f.write_str(name)
    }
}

/// The state of one workflow run.
///
/// Every variant carries its full inputs; nothing is kept in the workflow
/// struct between [`QuestionWorkflow::advance`] calls.
#[derive(Debug)]
pub enum WorkflowState {
    /// About to retrieve grounding chunks.
    Retrieving {
        /// The collection to search.
        collection: String,
        /// The topic query.
        query: String,
        /// How many chunks to retrieve.
        k: usize,
    },
    /// Chunks retrieved; about to generate candidates.
    Generating {
        /// The topic query.
        query: String,
        /// Retrieved chunks in relevance order.
        chunks: Vec<Chunk>,
    },
    /// Candidates generated; about to evaluate them.
    Evaluating {
        /// The topic query.
        query: String,
        /// The grounding chunks, passed through for evaluation context.
        chunks: Vec<Chunk>,
        /// Generated candidates in generation order.
        candidates: Vec<CandidateQuestion>,
    },
    /// Evaluations complete; about to apply the approval threshold.
    Finalizing {
        /// The topic query.
        query: String,
        /// How many chunks grounded this run.
        retrieved: usize,
        /// Evaluations in candidate order.
        evaluations: Vec<Evaluation>,
    },
    /// Terminal success.
    Done(QuestionSet),
    /// Terminal failure. Absorbing: advancing it returns it unchanged.
    Failed(WorkflowFailure),
}

impl WorkflowState {
    /// Whether the state is terminal (`Done` or `Failed`).
    pub fn is_terminal(&self) -> bool {
        matches!(self, WorkflowState::Done(_) | WorkflowState::Failed(_))
    }

    fn stage(&self) -> Option<Stage> {
        match self {
            WorkflowState::Retrieving { .. } => Some(Stage::Retrieving),
            WorkflowState::Generating { .. } => Some(Stage::Generating),
            WorkflowState::Evaluating { .. } => Some(Stage::Evaluating),
            WorkflowState::Finalizing { .. } => Some(Stage::Finalizing),
            WorkflowState::Done(_) | WorkflowState::Failed(_) => None,
        }
    }
}

/// Per-run counters for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Chunks retrieved.
    pub retrieved: usize,
    /// Candidates generated.
    pub generated: usize,
    /// Candidates evaluated.
    pub evaluated: usize,
    /// Evaluations that fell back to the minimum score.
    pub degraded: usize,
    /// Questions that met the approval threshold.
    pub approved: usize,
}

/// The final product of a successful run.
#[derive(Debug, Clone)]
pub struct QuestionSet {
    /// The topic query the set was generated for.
    pub query: String,
    /// Approved questions, in generation order.
    pub questions: Vec<EvaluatedQuestion>,
    /// Every evaluated question, approved or not, in generation order.
    pub evaluated: Vec<EvaluatedQuestion>,
    /// Run counters.
    pub report: RunReport,
}

/// Drives a retrieval pipeline and the three agents through one run.
pub struct QuestionWorkflow {
    pipeline: Arc<RagPipeline>,
    generator: Generator,
    evaluator: Evaluator,
    config: AgentConfig,
}

impl QuestionWorkflow {
    /// Assemble a workflow from its pipeline, agents and policy.
    pub fn new(
        pipeline: Arc<RagPipeline>,
        generator: Generator,
        evaluator: Evaluator,
        config: AgentConfig,
    ) -> Self {
        Self { pipeline, generator, evaluator, config }
    }

    /// Run one full pass: retrieve, generate, evaluate, finalize.
    ///
    /// # Errors
    ///
    /// Returns the [`WorkflowFailure`] from the stage that failed. Zero
    /// approved questions is success with an empty `questions` vector, not
    /// a failure.
    #[instrument(skip(self))]
    pub async fn run(
        &self,
        collection: &str,
        query: &str,
        k: usize,
    ) -> std::result::Result<QuestionSet, WorkflowFailure> {
        let mut state = WorkflowState::Retrieving {
            collection: collection.to_string(),
            query: query.to_string(),
            k,
        };
        loop {
            match self.advance(state).await {
                WorkflowState::Done(set) => return Ok(set),
                WorkflowState::Failed(failure) => return Err(failure),
                next => state = next,
            }
        }
    }

    /// Advance the state machine by exactly one transition.
    ///
    /// Terminal states are absorbing and come back unchanged. A stage error
    /// transitions to `Failed` tagged with the stage that raised it.
    pub async fn advance(&self, state: WorkflowState) -> WorkflowState {
        let stage = match state.stage() {
            Some(stage) => stage,
            None => return state,
        };
        match self.step(state).await {
            Ok(next) => next,
            Err(error) => {
                warn!(%stage, %error, "workflow stage failed");
                WorkflowState::Failed(WorkflowFailure { stage, error })
            }
        }
    }

    async fn step(&self, state: WorkflowState) -> Result<WorkflowState> {
        match state {
            WorkflowState::Retrieving { collection, query, k } => {
                let chunks = self.pipeline.retrieve(&collection, &query, k).await?;
                if chunks.is_empty() {
                    return Err(AgentError::NoRelevantChunks);
                }
                info!(count = chunks.len(), "retrieved grounding chunks");
                Ok(WorkflowState::Generating { query, chunks })
            }

            WorkflowState::Generating { query, chunks } => {
                let candidates =
                    self.generator.generate(&query, &chunks, self.config.target_count).await?;
                Ok(WorkflowState::Evaluating { query, chunks, candidates })
            }

            WorkflowState::Evaluating { query, chunks, candidates } => {
                let retrieved = chunks.len();
                // join_all keeps output order aligned with candidate order
                // even though the calls run concurrently.
                let evaluations = join_all(
                    candidates
                        .into_iter()
                        .map(|candidate| self.evaluator.evaluate(candidate, &chunks)),
                )
                .await;

                let all_unreachable = !evaluations.is_empty()
                    && evaluations
                        .iter()
                        .all(|e| e.outcome == EvalOutcome::DegradedUnreachable);
                if all_unreachable {
                    return Err(AgentError::EvaluatorUnavailable {
                        message: format!(
                            "all {} evaluation calls failed to reach the model",
                            evaluations.len()
                        ),
                    });
                }
                Ok(WorkflowState::Finalizing { query, retrieved, evaluations })
            }

            WorkflowState::Finalizing { query, retrieved, evaluations } => {
                let degraded = evaluations
                    .iter()
                    .filter(|e| e.outcome != EvalOutcome::Scored)
                    .count();
                let evaluated: Vec<EvaluatedQuestion> =
                    evaluations.into_iter().map(|e| e.question).collect();
                let generated = evaluated.len();

                let set = finalize(evaluated, self.config.approval_threshold);
                let report = RunReport {
                    retrieved,
                    generated,
                    evaluated: generated,
                    degraded,
                    approved: set.approved.len(),
                };
                info!(?report, "workflow run complete");
                Ok(WorkflowState::Done(QuestionSet {
                    query,
                    questions: set.approved,
                    evaluated: set.evaluated,
                    report,
                }))
            }

            terminal => Ok(terminal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names_read_naturally() {
        assert_eq!(Stage::Retrieving.to_string(), "retrieval");
        assert_eq!(Stage::Finalizing.to_string(), "finalization");
    }

    #[test]
    fn terminal_states_are_recognized() {
        let failed = WorkflowState::Failed(WorkflowFailure {
            stage: Stage::Generating,
            error: AgentError::NoRelevantChunks,
        });
        assert!(failed.is_terminal());

        let retrieving = WorkflowState::Retrieving {
            collection: "c".to_string(),
            query: "q".to_string(),
            k: 5,
        };
        assert!(!retrieving.is_terminal());
    }

    #[test]
    fn failure_message_names_the_stage() {
        let failure = WorkflowFailure {
            stage: Stage::Evaluating,
            error: AgentError::EvaluatorUnavailable { message: "down".to_string() },
        };
        let message = failure.to_string();
        assert!(message.contains("evaluation"));
        assert!(message.contains("down"));
    }
}
