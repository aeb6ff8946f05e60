//! The Evaluator agent: scores and critiques one candidate at a time.
//!
//! Evaluation never throws a batch away over one malformed item: any
//! failure degrades to the minimum score with feedback noting why. The
//! caller decides approval; this agent only computes score and feedback.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use quizforge_model::{Llm, LlmRequest};
use quizforge_rag::Chunk;

use crate::parse::extract_json_payload;
use crate::question::{CandidateQuestion, EvaluatedQuestion};

const SYSTEM_PROMPT: &str = "You are an educational assessment evaluator. \
Rate the given multiple choice question against the source content.\n\n\
Respond with ONLY a JSON object, no markdown and no surrounding text:\n\
{\"quality_score\": <integer 1-10>, \"evaluator_feedback\": \"<brief feedback>\"}";

/// The lowest score on the quality scale, used as the degraded fallback.
pub const MIN_SCORE: u8 = 1;

/// The highest score on the quality scale.
pub const MAX_SCORE: u8 = 10;

/// How an evaluation concluded, for run diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOutcome {
    /// The model returned a usable verdict.
    Scored,
    /// The verdict could not be parsed; the minimum score was substituted.
    DegradedParse,
    /// The model could not be reached; the minimum score was substituted.
    DegradedUnreachable,
}

/// One evaluated candidate plus how its evaluation concluded.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The evaluated question, score and feedback attached.
    pub question: EvaluatedQuestion,
    /// Diagnostic outcome; degraded outcomes are not user-facing errors.
    pub outcome: EvalOutcome,
}

/// The model's verdict as it appears on the wire.
#[derive(Debug, Deserialize)]
struct Verdict {
    quality_score: Option<i64>,
    #[serde(default)]
    evaluator_feedback: String,
}

/// Scores candidate questions independently, one model call per candidate.
pub struct Evaluator {
    llm: Arc<dyn Llm>,
    max_context_chars: usize,
}

impl Evaluator {
    /// Create an evaluator over the given LLM backend.
    pub fn new(llm: Arc<dyn Llm>, max_context_chars: usize) -> Self {
        Self { llm, max_context_chars }
    }

    /// Evaluate one candidate against its grounding chunks.
    ///
    /// Infallible by design: malformed or missing verdicts become the
    /// minimum score with feedback noting the failure, so no candidate is
    /// ever dropped. Candidates are independent; concurrent dispatch is
    /// safe.
    pub async fn evaluate(
        &self,
        candidate: CandidateQuestion,
        chunks: &[Chunk],
    ) -> Evaluation {
        let (score, feedback, outcome) = match self.verdict(&candidate, chunks).await {
            Ok(verdict) => match verdict.quality_score {
                Some(raw) => {
                    let score = raw.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8;
                    (score, verdict.evaluator_feedback, EvalOutcome::Scored)
                }
                None => (
                    MIN_SCORE,
                    "evaluation verdict had no quality_score; defaulted to minimum".to_string(),
                    EvalOutcome::DegradedParse,
                ),
            },
            Err(EvalFailure::Parse(detail)) => {
                warn!(detail = %detail, "evaluation verdict unparseable, using minimum score");
                (
                    MIN_SCORE,
                    format!("evaluation response could not be parsed: {detail}"),
                    EvalOutcome::DegradedParse,
                )
            }
            Err(EvalFailure::Transport(detail)) => {
                warn!(detail = %detail, "evaluation call failed, using minimum score");
                (
                    MIN_SCORE,
                    format!("evaluation call failed: {detail}"),
                    EvalOutcome::DegradedUnreachable,
                )
            }
        };

        info!(score, outcome = ?outcome, "evaluated candidate");
        Evaluation {
            question: EvaluatedQuestion {
                question: candidate,
                quality_score: score,
                evaluator_feedback: feedback,
                // The finalizer owns the approval decision.
                approved: false,
            },
            outcome,
        }
    }

    /// One evaluation call: complete, repair, parse.
    async fn verdict(
        &self,
        candidate: &CandidateQuestion,
        chunks: &[Chunk],
    ) -> std::result::Result<Verdict, EvalFailure> {
        let question_json = serde_json::to_string_pretty(candidate)
            .map_err(|e| EvalFailure::Parse(e.to_string()))?;

        let mut context = chunks
            .iter()
            .enumerate()
            .map(|(i, c)| format!("Document {} (page {}):\n{}", i + 1, c.page, c.text))
            .collect::<Vec<_>>()
            .join("\n\n");
        if context.chars().count() > self.max_context_chars {
            context = context.chars().take(self.max_context_chars).collect();
        }

        let user_prompt = format!(
            "SOURCE CONTENT:\n{context}\n\nQUESTION TO EVALUATE:\n{question_json}\n\n\
             Return ONLY the JSON verdict object."
        );

        let request =
            LlmRequest::new(user_prompt).with_system(SYSTEM_PROMPT).expect_json();
        let response = self
            .llm
            .complete(request)
            .await
            .map_err(|e| EvalFailure::Transport(e.to_string()))?;

        let payload = extract_json_payload(&response.text);
        serde_json::from_str(payload).map_err(|e| EvalFailure::Parse(e.to_string()))
    }
}

/// Why a single evaluation could not produce a verdict.
enum EvalFailure {
    Parse(String),
    Transport(String),
}
