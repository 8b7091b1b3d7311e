//! Batch scoring — validates a question/answer batch and evaluates it pair by pair.
//!
//! Flow: validate → for each index (in order) skip blank pairs, evaluate the
//! rest sequentially → summarize.
//!
//! Pairs are evaluated one at a time. The first completion failure aborts the
//! whole batch; no partial results are returned.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scoring::evaluator::AnswerEvaluator;
use crate::scoring::extractor::EvaluationResult;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Request body for batch scoring. Fields are kept as raw JSON so that a
/// non-array value is reported as invalid input rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub questions: Value,
    #[serde(default)]
    pub answers: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("Questions and answers must be arrays")]
    NotAList,

    #[error("Questions and answers cannot be empty")]
    Empty,

    #[error("Number of questions and answers must match")]
    LengthMismatch { questions: usize, answers: usize },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    pub question: String,
    pub user_answer: String,
    pub analysis: EvaluationResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Input length, blank pairs included.
    pub total_questions: usize,
    /// Mean over produced items only. NaN (serialized as `null`) when every pair was skipped.
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub results: Vec<ScoredItem>,
    pub summary: BatchSummary,
}

/// A validated batch: equal-length, non-empty, blank entries as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBatch {
    pub questions: Vec<Option<String>>,
    pub answers: Vec<Option<String>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate(request: &ScoreRequest) -> Result<ValidatedBatch, InvalidInput> {
    let (questions, answers) = match (request.questions.as_array(), request.answers.as_array()) {
        (Some(q), Some(a)) => (q, a),
        _ => return Err(InvalidInput::NotAList),
    };

    if questions.is_empty() || answers.is_empty() {
        return Err(InvalidInput::Empty);
    }

    if questions.len() != answers.len() {
        return Err(InvalidInput::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }

    Ok(ValidatedBatch {
        questions: questions.iter().map(non_blank_text).collect(),
        answers: answers.iter().map(non_blank_text).collect(),
    })
}

/// Text form of one element; `None` for falsy values (null, false, zero)
/// and whitespace-only strings.
fn non_blank_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub struct BatchScorer<'a> {
    evaluator: &'a AnswerEvaluator,
}

impl<'a> BatchScorer<'a> {
    pub fn new(evaluator: &'a AnswerEvaluator) -> Self {
        Self { evaluator }
    }

    /// Validates then scores every non-blank pair, in input order.
    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreReport, AppError> {
        let batch = validate(request)?;
        let batch_id = Uuid::new_v4();
        let total_questions = batch.questions.len();
        info!("Scoring batch {batch_id} with {total_questions} questions");

        let mut results = Vec::with_capacity(total_questions);
        for (index, pair) in batch.questions.iter().zip(&batch.answers).enumerate() {
            let (question, answer) = match pair {
                (Some(q), Some(a)) => (q, a),
                _ => {
                    debug!("Batch {batch_id}: skipping blank pair at index {index}");
                    continue;
                }
            };

            let analysis = self.evaluator.evaluate(question, answer).await?;
            results.push(ScoredItem {
                question: question.clone(),
                user_answer: answer.clone(),
                analysis,
            });
        }

        let summary = summarize(total_questions, &results);
        info!(
            "Batch {batch_id} scored: {} of {} pairs, average {}",
            results.len(),
            total_questions,
            summary.average_score
        );

        Ok(ScoreReport { results, summary })
    }
}

/// Division by zero is left in place: an all-blank batch averages to NaN.
pub fn summarize(total_questions: usize, results: &[ScoredItem]) -> BatchSummary {
    let sum: f64 = results.iter().map(|item| item.analysis.score).sum();
    BatchSummary {
        total_questions,
        average_score: sum / results.len() as f64,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
