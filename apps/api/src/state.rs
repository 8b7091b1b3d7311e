use crate::config::Config;
use crate::scoring::evaluator::AnswerEvaluator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Holds the completion provider and answer store behind trait objects.
    pub evaluator: AnswerEvaluator,
    pub config: Config,
}
