//! Agent pipeline for grounded multiple-choice question generation.
//!
//! Three agents run in sequence over content retrieved by
//! [`quizforge_rag`]: a [`Generator`] turns chunks into candidate
//! questions, an [`Evaluator`] scores each candidate independently, and
//! the finalizer applies the approval threshold. [`QuestionWorkflow`]
//! drives the stages as an explicit state machine, so a failed run always
//! reports which stage failed and why.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use quizforge_agent::{AgentConfig, Evaluator, Generator, QuestionWorkflow};
//! use quizforge_model::GeminiClient;
//! use quizforge_rag::{InMemoryVectorStore, RagPipeline};
//!
//! # async fn example(provider: Arc<dyn quizforge_rag::EmbeddingProvider>) -> anyhow::Result<()> {
//! let pipeline = Arc::new(
//!     RagPipeline::builder()
//!         .embedding_provider(provider)
//!         .vector_store(Arc::new(InMemoryVectorStore::new()))
//!         .build()?,
//! );
//! let llm = Arc::new(GeminiClient::from_env()?);
//! let config = AgentConfig::default();
//!
//! let workflow = QuestionWorkflow::new(
//!     pipeline,
//!     Generator::new(llm.clone(), config.temperature, config.max_context_chars),
//!     Evaluator::new(llm, config.max_context_chars),
//!     config,
//! );
//! let set = workflow.run("textbook", "ownership and borrowing", 5).await?;
//! println!("approved {} questions", set.questions.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod evaluator;
mod finalizer;
mod generator;
mod parse;
mod question;
mod workflow;

pub use config::{AgentConfig, AgentConfigBuilder};
pub use error::{AgentError, Result, WorkflowFailure};
pub use evaluator::{EvalOutcome, Evaluation, Evaluator, MAX_SCORE, MIN_SCORE};
pub use finalizer::{finalize, FinalizedSet};
pub use generator::Generator;
pub use parse::extract_json_payload;
pub use question::{AnswerKey, CandidateQuestion, EvaluatedQuestion};
pub use workflow::{QuestionSet, QuestionWorkflow, RunReport, Stage, WorkflowState};
