//! Answer evaluation — one completion call per question/answer pair.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::scoring::extractor::{extract, EvaluationResult};
use crate::scoring::prompts::{
    build_evaluation_prompt, EVALUATION_MAX_TOKENS, EVALUATION_SYSTEM, EVALUATION_TEMPERATURE,
};
use crate::scoring::store::AnswerStore;

/// Scores a single answer and records the generated ideal answer.
#[derive(Clone)]
pub struct AnswerEvaluator {
    completion: Arc<dyn CompletionProvider>,
    store: Arc<dyn AnswerStore>,
}

impl AnswerEvaluator {
    pub fn new(completion: Arc<dyn CompletionProvider>, store: Arc<dyn AnswerStore>) -> Self {
        Self { completion, store }
    }

    pub fn store(&self) -> &Arc<dyn AnswerStore> {
        &self.store
    }

    /// Evaluates `answer` against `question`.
    ///
    /// A failed completion call is returned to the caller. A failed store write
    /// is logged and otherwise ignored.
    pub async fn evaluate(&self, question: &str, answer: &str) -> Result<EvaluationResult, LlmError> {
        let request = CompletionRequest {
            system: EVALUATION_SYSTEM.to_string(),
            prompt: build_evaluation_prompt(question, answer),
            temperature: EVALUATION_TEMPERATURE,
            max_tokens: EVALUATION_MAX_TOKENS,
        };

        let text = self.completion.complete(&request).await?;
        let analysis = extract(&text);
        debug!(
            "Evaluated answer: score={}, feedback_len={}",
            analysis.score,
            analysis.feedback.len()
        );

        if let Err(e) = self
            .store
            .store_generated_qa(question, &analysis.correct_answer)
            .await
        {
            warn!("Failed to store ideal answer: {e}");
        }

        Ok(analysis)
    }
}
