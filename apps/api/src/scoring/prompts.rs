// Prompt constants for answer evaluation.

/// System instruction sent with every evaluation call.
pub const EVALUATION_SYSTEM: &str = "You are an expert technical interviewer. \
    Generate an ideal answer and evaluate the candidate's response. \
    Put each part on its own line, labelled 'Score:' (out of 10), \
    'Feedback:' and 'Ideal Answer:'.";

pub const EVALUATION_TEMPERATURE: f32 = 0.7;
pub const EVALUATION_MAX_TOKENS: u32 = 500;

/// Per-item prompt pairing the question with the candidate's answer.
pub fn build_evaluation_prompt(question: &str, answer: &str) -> String {
    format!("Question: {question}\nCandidate's Answer: {answer}")
}
