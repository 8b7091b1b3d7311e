use crate::session::SessionError;

/// Lines this short are list markers or stray fragments, not questions.
const MIN_QUESTION_CHARS: usize = 4;

/// Splits raw generator output into one question per line.
pub fn parse_questions(raw: &str) -> Result<Vec<String>, SessionError> {
    let questions: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_QUESTION_CHARS)
        .map(str::to_string)
        .collect();

    if questions.is_empty() {
        return Err(SessionError::NoQuestions);
    }
    Ok(questions)
}
