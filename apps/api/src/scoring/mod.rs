// Scoring: evaluates free-text interview answers against model answers
// produced by the completion capability.

pub mod batch;
pub mod evaluator;
pub mod extractor;
pub mod handlers;
pub mod prompts;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
