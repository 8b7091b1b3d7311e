//! Axum route handlers for the Scoring API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::scoring::batch::{BatchScorer, ScoreReport, ScoreRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IdealAnswerQuery {
    pub question: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdealAnswerResponse {
    pub question: String,
    pub ideal_answer: String,
}

/// POST /api/v1/score
///
/// Scores parallel lists of questions and answers and returns per-item
/// analyses plus a summary.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreReport>, AppError> {
    let report = BatchScorer::new(&state.evaluator).score(&request).await?;
    Ok(Json(report))
}

/// GET /api/v1/ideal-answers?question=...
///
/// Returns the ideal answer stored for a question by an earlier scoring run.
pub async fn handle_get_ideal_answer(
    State(state): State<AppState>,
    Query(query): Query<IdealAnswerQuery>,
) -> Result<Json<IdealAnswerResponse>, AppError> {
    let ideal_answer = state
        .evaluator
        .store()
        .get_stored_answer(&query.question)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No stored answer for '{}'", query.question)))?;

    Ok(Json(IdealAnswerResponse {
        question: query.question,
        ideal_answer,
    }))
}
