//! Ideal-answer store — remembers the model answer generated for each question.
//!
//! Keyed by the exact question text. The scoring path only writes here; reads
//! are exposed over HTTP for callers that want to reuse a stored answer.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait AnswerStore: Send + Sync {
    /// Upserts the ideal answer for `question`.
    async fn store_generated_qa(&self, question: &str, ideal_answer: &str) -> Result<(), StoreError>;

    async fn get_stored_answer(&self, question: &str) -> Result<Option<String>, StoreError>;
}

/// PostgreSQL-backed store over the `ideal_answers` table.
pub struct PgAnswerStore {
    pool: PgPool,
}

impl PgAnswerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnswerStore for PgAnswerStore {
    async fn store_generated_qa(&self, question: &str, ideal_answer: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO ideal_answers (id, question, ideal_answer)
            VALUES ($1, $2, $3)
            ON CONFLICT (question)
            DO UPDATE SET ideal_answer = EXCLUDED.ideal_answer, updated_at = NOW()
            "#,
        )
        .bind(uuid::Uuid::new_v4())
        .bind(question)
        .bind(ideal_answer)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_stored_answer(&self, question: &str) -> Result<Option<String>, StoreError> {
        let answer: Option<String> =
            sqlx::query_scalar("SELECT ideal_answer FROM ideal_answers WHERE question = $1")
                .bind(question)
                .fetch_optional(&self.pool)
                .await?;
        Ok(answer)
    }
}

/// In-process store used when no database is configured. Lost on restart.
#[derive(Default)]
pub struct MemoryAnswerStore {
    answers: RwLock<HashMap<String, String>>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.answers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.answers.read().await.is_empty()
    }
}

#[async_trait]
impl AnswerStore for MemoryAnswerStore {
    async fn store_generated_qa(&self, question: &str, ideal_answer: &str) -> Result<(), StoreError> {
        self.answers
            .write()
            .await
            .insert(question.to_string(), ideal_answer.to_string());
        Ok(())
    }

    async fn get_stored_answer(&self, question: &str) -> Result<Option<String>, StoreError> {
        Ok(self.answers.read().await.get(question).cloned())
    }
}
