//! Data types for candidate and evaluated questions.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The label of one of the four answer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    /// All four keys in order.
    pub const ALL: [AnswerKey; 4] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            AnswerKey::A => "A",
            AnswerKey::B => "B",
            AnswerKey::C => "C",
            AnswerKey::D => "D",
        };
        f.write_str(letter)
    }
}

/// A generated multiple-choice question, prior to evaluation.
///
/// Question content is never altered after generation; evaluation only
/// attaches score and feedback fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateQuestion {
    /// The question text.
    pub question: String,
    /// The four labeled options. Exactly the keys A–D must be present.
    pub options: BTreeMap<AnswerKey, String>,
    /// Which option is correct.
    pub correct_answer: AnswerKey,
    /// Why the correct answer is correct, citing the grounding content.
    pub explanation: String,
}

impl CandidateQuestion {
    /// Check the structural contract: all four options A–D present and
    /// non-empty question text.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question text is empty".to_string());
        }
        for key in AnswerKey::ALL {
            if !self.options.contains_key(&key) {
                return Err(format!("missing option {key}"));
            }
        }
        if self.options.len() != 4 {
            return Err(format!("expected 4 options, got {}", self.options.len()));
        }
        Ok(())
    }
}

/// A candidate question with its evaluation attached. Terminal and
/// immutable once finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EvaluatedQuestion {
    /// The unaltered candidate question.
    #[serde(flatten)]
    pub question: CandidateQuestion,
    /// Integer quality rating in 1–10.
    pub quality_score: u8,
    /// Short feedback from the evaluator.
    pub evaluator_feedback: String,
    /// Whether the question met the acceptance threshold. Decided by the
    /// finalizer, not the evaluator.
    pub approved: bool,
}
