//! The Finalizer: deterministic threshold filtering, no model call.

use tracing::info;

use crate::question::EvaluatedQuestion;

/// The finalized output of one workflow run.
#[derive(Debug, Clone)]
pub struct FinalizedSet {
    /// Every evaluated question, in generation order, with `approved` set.
    pub evaluated: Vec<EvaluatedQuestion>,
    /// The approved subsequence, same relative order as `evaluated`.
    pub approved: Vec<EvaluatedQuestion>,
}

/// Mark each question approved when its score meets `threshold`, and split
/// out the approved subsequence.
///
/// Pure and deterministic. Zero approvals is a valid outcome, not an error.
pub fn finalize(mut evaluated: Vec<EvaluatedQuestion>, threshold: u8) -> FinalizedSet {
    for question in &mut evaluated {
        question.approved = question.quality_score >= threshold;
    }
    let approved: Vec<EvaluatedQuestion> =
        evaluated.iter().filter(|q| q.approved).cloned().collect();

    info!(total = evaluated.len(), approved = approved.len(), threshold, "finalized question set");
    FinalizedSet { evaluated, approved }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::question::{AnswerKey, CandidateQuestion};

    fn evaluated(label: &str, score: u8) -> EvaluatedQuestion {
        EvaluatedQuestion {
            question: CandidateQuestion {
                question: label.to_string(),
                options: BTreeMap::from([
                    (AnswerKey::A, "a".to_string()),
                    (AnswerKey::B, "b".to_string()),
                    (AnswerKey::C, "c".to_string()),
                    (AnswerKey::D, "d".to_string()),
                ]),
                correct_answer: AnswerKey::A,
                explanation: "because".to_string(),
            },
            quality_score: score,
            evaluator_feedback: String::new(),
            approved: false,
        }
    }

    #[test]
    fn keeps_scores_at_or_above_threshold_in_order() {
        let input = vec![
            evaluated("q1", 9),
            evaluated("q2", 6),
            evaluated("q3", 5),
            evaluated("q4", 3),
            evaluated("q5", 10),
        ];
        let set = finalize(input, 6);

        let approved: Vec<u8> = set.approved.iter().map(|q| q.quality_score).collect();
        assert_eq!(approved, vec![9, 6, 10]);
        assert_eq!(set.evaluated.len(), 5);
    }

    #[test]
    fn marks_approved_on_the_full_set_too() {
        let set = finalize(vec![evaluated("q1", 7), evaluated("q2", 2)], 6);
        assert!(set.evaluated[0].approved);
        assert!(!set.evaluated[1].approved);
    }

    #[test]
    fn zero_approvals_is_an_empty_set_not_an_error() {
        let set = finalize(vec![evaluated("q1", 2), evaluated("q2", 1)], 6);
        assert!(set.approved.is_empty());
        assert_eq!(set.evaluated.len(), 2);
    }

    #[test]
    fn threshold_is_inclusive() {
        let set = finalize(vec![evaluated("q1", 6)], 6);
        assert_eq!(set.approved.len(), 1);
    }

    #[test]
    fn empty_input_finalizes_to_empty_output() {
        let set = finalize(Vec::new(), 6);
        assert!(set.evaluated.is_empty());
        assert!(set.approved.is_empty());
    }
}
