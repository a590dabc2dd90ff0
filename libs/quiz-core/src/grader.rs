//! Answer grading for typed English answers.
//!
//! Grading is an exact comparison after normalization. There is no fuzzy or
//! partial matching: `"abduct"` does not match `"abduction"`.

use crate::types::{AnswerRecord, QuizItem};

/// Lower-case, trim, and collapse whitespace runs to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether the typed answer matches the correct answer.
pub fn grade(user_answer: &str, correct_answer: &str) -> bool {
    normalize(user_answer) == normalize(correct_answer)
}

/// Grade one presented item and build its record.
pub fn grade_item(item: &QuizItem, user_answer: &str) -> AnswerRecord {
    AnswerRecord {
        quiz_id: item.id.clone(),
        term_id: item.term_id.clone(),
        prompt_type: item.prompt_type,
        prompt_text: item.prompt_text.clone(),
        user_answer: user_answer.to_string(),
        correct_answer: item.answer.clone(),
        is_correct: grade(user_answer, &item.answer),
        source_id: item.source_id.clone(),
        source_name: item.source_name.clone(),
    }
}
