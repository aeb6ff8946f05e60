//! End-to-end workflow tests over an in-memory index and scripted LLMs.

use std::sync::Arc;

use async_trait::async_trait;

use quizforge_agent::{
    AgentConfig, AgentError, Evaluator, Generator, QuestionWorkflow, Stage, WorkflowState,
};
use quizforge_model::MockLlm;
use quizforge_rag::{
    EmbeddingProvider, InMemoryVectorStore, RagError, RagPipeline, Result as RagResult,
};

const DIMS: usize = 8;

/// Deterministic toy embeddings: texts sharing words land near each other.
struct HashEmbedder;

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> RagResult<Vec<f32>> {
        let mut v = vec![0.0f32; DIMS];
        for word in text.split_whitespace() {
            let mut h: u64 = 1469598103934665603;
            for b in word.bytes() {
                h ^= b as u64;
                h = h.wrapping_mul(1099511628211);
            }
            v[(h % DIMS as u64) as usize] += 1.0;
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        DIMS
    }
}

fn pipeline() -> Arc<RagPipeline> {
    Arc::new(
        RagPipeline::builder()
            .embedding_provider(Arc::new(HashEmbedder))
            .vector_store(Arc::new(InMemoryVectorStore::new()))
            .build()
            .unwrap(),
    )
}

async fn seeded_pipeline(collection: &str) -> Arc<RagPipeline> {
    let pipeline = pipeline();
    pipeline.create_collection(collection).await.unwrap();
    pipeline
        .ingest(
            collection,
            Some("rust-book.pdf"),
            vec![
                "1. Ownership\nEvery value has a single owner. \
                 When the owner goes out of scope the value is dropped."
                    .to_string(),
                "2.1 Borrowing\nReferences borrow values without taking ownership. \
                 SMART POINTERS\nBox and Rc manage heap allocations."
                    .to_string(),
            ],
        )
        .await
        .unwrap();
    pipeline
}

fn question_json(label: &str) -> String {
    format!(
        r#"{{"question": "{label}?",
            "options": {{"A": "a", "B": "b", "C": "c", "D": "d"}},
            "correct_answer": "A",
            "explanation": "Document 1 covers {label}."}}"#
    )
}

fn batch_json(labels: &[&str]) -> String {
    let items: Vec<String> = labels.iter().map(|l| question_json(l)).collect();
    format!("[{}]", items.join(","))
}

fn verdict_json(score: i32, feedback: &str) -> String {
    format!(r#"{{"quality_score": {score}, "evaluator_feedback": "{feedback}"}}"#)
}

fn workflow(
    pipeline: Arc<RagPipeline>,
    generator_llm: MockLlm,
    evaluator_llm: MockLlm,
    config: AgentConfig,
) -> QuestionWorkflow {
    QuestionWorkflow::new(
        pipeline,
        Generator::new(Arc::new(generator_llm), config.temperature, config.max_context_chars),
        Evaluator::new(Arc::new(evaluator_llm), config.max_context_chars),
        config,
    )
}

#[tokio::test]
async fn full_run_approves_by_threshold_preserving_order() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::default();

    let generator_llm =
        MockLlm::new().push_text(batch_json(&["q1", "q2", "q3", "q4", "q5"]));
    let evaluator_llm = MockLlm::new()
        .push_text(verdict_json(9, "strong"))
        .push_text(verdict_json(3, "weak"))
        .push_text(verdict_json(7, "good"))
        .push_text(verdict_json(6, "acceptable"))
        .push_text(verdict_json(10, "excellent"));

    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config);
    let set = workflow.run("textbook", "ownership and borrowing", 5).await.unwrap();

    assert_eq!(set.evaluated.len(), 5);
    let approved: Vec<&str> =
        set.questions.iter().map(|q| q.question.question.as_str()).collect();
    assert_eq!(approved, vec!["q1?", "q3?", "q4?", "q5?"]);
    assert!(set.questions.iter().all(|q| q.approved));

    assert_eq!(set.report.generated, 5);
    assert_eq!(set.report.approved, 4);
    assert_eq!(set.report.degraded, 0);
    assert!(set.report.retrieved >= 1);
}

#[tokio::test]
async fn ingest_reports_the_outline_in_page_order() {
    let pipeline = pipeline();
    pipeline.create_collection("textbook").await.unwrap();
    let report = pipeline
        .ingest(
            "textbook",
            None,
            vec![
                "1. Ownership\nbody text".to_string(),
                "2.1 Borrowing\nbody\nSMART POINTERS\nmore body".to_string(),
            ],
        )
        .await
        .unwrap();

    let headings: Vec<(usize, &str)> =
        report.outline.iter().map(|e| (e.page, e.heading.as_str())).collect();
    assert_eq!(
        headings,
        vec![(1, "1. Ownership"), (2, "2.1 Borrowing"), (2, "SMART POINTERS")]
    );
}

#[tokio::test]
async fn empty_retrieval_fails_at_the_retrieving_stage() {
    let pipeline = pipeline();
    pipeline.create_collection("empty").await.unwrap();

    let workflow =
        workflow(pipeline, MockLlm::new(), MockLlm::new(), AgentConfig::default());
    let failure = workflow.run("empty", "anything", 5).await.unwrap_err();

    assert_eq!(failure.stage, Stage::Retrieving);
    assert!(matches!(failure.error, AgentError::NoRelevantChunks));
}

#[tokio::test]
async fn missing_collection_surfaces_the_index_error() {
    let workflow =
        workflow(pipeline(), MockLlm::new(), MockLlm::new(), AgentConfig::default());
    let failure = workflow.run("nowhere", "anything", 5).await.unwrap_err();

    assert_eq!(failure.stage, Stage::Retrieving);
    assert!(matches!(
        failure.error,
        AgentError::Rag(RagError::IndexUnavailable { .. })
    ));
}

#[tokio::test]
async fn persistent_format_failure_fails_at_the_generating_stage() {
    let pipeline = seeded_pipeline("textbook").await;
    let generator_llm =
        MockLlm::new().push_text("not json").push_text("still not json");

    let workflow =
        workflow(pipeline, generator_llm, MockLlm::new(), AgentConfig::default());
    let failure = workflow.run("textbook", "ownership", 5).await.unwrap_err();

    assert_eq!(failure.stage, Stage::Generating);
    assert!(matches!(failure.error, AgentError::GenerationFormat { .. }));
}

#[tokio::test]
async fn total_evaluator_outage_fails_at_the_evaluating_stage() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(3).build().unwrap();

    let generator_llm = MockLlm::new().push_text(batch_json(&["q1", "q2", "q3"]));
    let evaluator_llm = MockLlm::new()
        .push_error("connection refused")
        .push_error("connection refused")
        .push_error("connection refused");

    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config);
    let failure = workflow.run("textbook", "ownership", 5).await.unwrap_err();

    assert_eq!(failure.stage, Stage::Evaluating);
    assert!(matches!(failure.error, AgentError::EvaluatorUnavailable { .. }));
}

#[tokio::test]
async fn partial_evaluation_failures_degrade_instead_of_failing() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(3).build().unwrap();

    let generator_llm = MockLlm::new().push_text(batch_json(&["q1", "q2", "q3"]));
    let evaluator_llm = MockLlm::new()
        .push_text(verdict_json(8, "good"))
        .push_error("connection refused")
        .push_text("this is not a verdict");

    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config);
    let set = workflow.run("textbook", "ownership", 5).await.unwrap();

    assert_eq!(set.evaluated.len(), 3);
    assert_eq!(set.report.degraded, 2);
    let scores: Vec<u8> = set.evaluated.iter().map(|q| q.quality_score).collect();
    assert_eq!(scores, vec![8, 1, 1]);
    assert_eq!(set.questions.len(), 1);
    assert_eq!(set.questions[0].question.question, "q1?");
}

#[tokio::test]
async fn zero_approved_questions_is_success_not_failure() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(2).build().unwrap();

    let generator_llm = MockLlm::new().push_text(batch_json(&["q1", "q2"]));
    let evaluator_llm = MockLlm::new().always(&verdict_json(2, "shallow"));

    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config);
    let set = workflow.run("textbook", "ownership", 5).await.unwrap();

    assert!(set.questions.is_empty());
    assert_eq!(set.evaluated.len(), 2);
    assert_eq!(set.report.approved, 0);
    assert!(set.evaluated.iter().all(|q| !q.approved));
}

#[tokio::test]
async fn advance_walks_the_stages_one_transition_at_a_time() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(1).build().unwrap();

    let generator_llm = MockLlm::new().push_text(batch_json(&["q1"]));
    let evaluator_llm = MockLlm::new().push_text(verdict_json(7, "fine"));

    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config);
    let mut state = WorkflowState::Retrieving {
        collection: "textbook".to_string(),
        query: "ownership".to_string(),
        k: 3,
    };

    state = workflow.advance(state).await;
    assert!(matches!(state, WorkflowState::Generating { .. }));

    state = workflow.advance(state).await;
    assert!(matches!(state, WorkflowState::Evaluating { .. }));

    state = workflow.advance(state).await;
    assert!(matches!(state, WorkflowState::Finalizing { .. }));

    state = workflow.advance(state).await;
    assert!(matches!(state, WorkflowState::Done(_)));
}

#[tokio::test]
async fn failed_state_is_absorbing() {
    let workflow =
        workflow(pipeline(), MockLlm::new(), MockLlm::new(), AgentConfig::default());

    let failed = workflow
        .advance(WorkflowState::Retrieving {
            collection: "nowhere".to_string(),
            query: "q".to_string(),
            k: 1,
        })
        .await;
    assert!(matches!(failed, WorkflowState::Failed(_)));

    let still_failed = workflow.advance(failed).await;
    assert!(matches!(still_failed, WorkflowState::Failed(_)));
}

#[tokio::test]
async fn concurrent_evaluation_matches_sequential_evaluation() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(4).build().unwrap();
    let batch = batch_json(&["q1", "q2", "q3", "q4"]);
    let verdicts = [
        verdict_json(9, "strong"),
        verdict_json(2, "weak"),
        verdict_json(7, "good"),
        verdict_json(5, "middling"),
    ];

    // Sequential baseline: evaluate the same candidates one at a time.
    let candidates: Vec<quizforge_agent::CandidateQuestion> =
        serde_json::from_str(&batch).unwrap();
    let mut sequential_llm = MockLlm::new();
    for verdict in &verdicts {
        sequential_llm = sequential_llm.push_text(verdict);
    }
    let sequential = Evaluator::new(Arc::new(sequential_llm), config.max_context_chars);
    let chunks = pipeline.retrieve("textbook", "ownership", 5).await.unwrap();
    let mut baseline = Vec::new();
    for candidate in candidates {
        baseline.push(sequential.evaluate(candidate, &chunks).await.question);
    }

    // Concurrent run through the workflow, same scripts.
    let generator_llm = MockLlm::new().push_text(batch);
    let mut evaluator_llm = MockLlm::new();
    for verdict in &verdicts {
        evaluator_llm = evaluator_llm.push_text(verdict);
    }
    let workflow = workflow(pipeline, generator_llm, evaluator_llm, config.clone());
    let set = workflow.run("textbook", "ownership", 5).await.unwrap();

    let concurrent: Vec<(&str, u8)> = set
        .evaluated
        .iter()
        .map(|q| (q.question.question.as_str(), q.quality_score))
        .collect();
    let expected: Vec<(&str, u8)> = baseline
        .iter()
        .map(|q| (q.question.question.as_str(), q.quality_score))
        .collect();
    assert_eq!(concurrent, expected);
}

#[tokio::test]
async fn generation_retry_consumes_a_second_llm_call() {
    let pipeline = seeded_pipeline("textbook").await;
    let config = AgentConfig::builder().target_count(1).build().unwrap();

    let generator_llm =
        MockLlm::new().push_text("```json\ngarbage\n```").push_text(batch_json(&["q1"]));
    let generator_ref = Arc::new(generator_llm);
    let evaluator_llm = MockLlm::new().push_text(verdict_json(9, "great"));

    let workflow = QuestionWorkflow::new(
        pipeline,
        Generator::new(generator_ref.clone(), config.temperature, config.max_context_chars),
        Evaluator::new(Arc::new(evaluator_llm), config.max_context_chars),
        config,
    );
    let set = workflow.run("textbook", "ownership", 5).await.unwrap();

    assert_eq!(generator_ref.call_count(), 2);
    assert_eq!(set.questions.len(), 1);
}
