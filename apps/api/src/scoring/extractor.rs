//! Response field extraction — best-effort parsing of free-form evaluator text.
//!
//! The completion output has no guaranteed structure, so every field is looked
//! up independently and a miss degrades to a placeholder instead of an error.
//! This is natural-language scraping, not a grammar.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_FEEDBACK: &str = "No feedback provided";
pub const DEFAULT_IDEAL_ANSWER: &str = "No ideal answer available";

const MAX_SCORE: f64 = 10.0;

/// First numeral in the text, with an optional "score" label and optional "/10" suffix.
static SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:score:?\s*)?(\d+(?:\.\d+)?)\s*(?:/\s*10)?\b").expect("valid score regex")
});

static FEEDBACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)feedback:?([^\n]*)").expect("valid feedback regex"));

static IDEAL_ANSWER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ideal answer:?([^\n]*)").expect("valid ideal answer regex"));

/// Structured view of one evaluator response. Always fully populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// 0 – 10; 0 when no numeral could be found.
    pub score: f64,
    pub feedback: String,
    pub correct_answer: String,
}

/// Extracts score, feedback and ideal answer from raw evaluator text.
/// Never fails; unmatched fields fall back to their defaults.
pub fn extract(text: &str) -> EvaluationResult {
    EvaluationResult {
        score: extract_score(text),
        feedback: non_empty_or(extract_line_after(&FEEDBACK, text), DEFAULT_FEEDBACK),
        correct_answer: non_empty_or(extract_line_after(&IDEAL_ANSWER, text), DEFAULT_IDEAL_ANSWER),
    }
}

/// The first numeral wins, labelled or not.
fn extract_score(text: &str) -> f64 {
    SCORE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(|score| score.clamp(0.0, MAX_SCORE))
        .unwrap_or(0.0)
}

/// Rest of the line after the first match of `label`, trimmed.
fn extract_line_after(label: &Regex, text: &str) -> String {
    label
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
