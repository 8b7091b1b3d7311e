//! In-test stand-ins for the completion capability and the answer store.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::scoring::store::{AnswerStore, StoreError};

/// Replays canned completions in order and records every request it sees.
/// Once the script runs out it answers with `fallback`.
pub struct ScriptedCompletion {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    fallback: String,
    requests: Mutex<Vec<CompletionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedCompletion {
    pub fn always(text: &str) -> Self {
        Self::scripted(Vec::new(), text)
    }

    pub fn scripted(script: Vec<Result<String, LlmError>>, fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: fallback.to_string(),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

/// A store whose writes always fail.
pub struct BrokenStore;

#[async_trait]
impl AnswerStore for BrokenStore {
    async fn store_generated_qa(&self, _question: &str, _ideal_answer: &str) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get_stored_answer(&self, _question: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
