//! Core types for the terminology quiz.

use serde::{Deserialize, Serialize};

/// Source bucket used for terms that carry no source id.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Term read from a CSV row, before it is attached to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTerm {
    pub en: String,
    pub ko: String,
    pub desc: String,
    pub line_number: usize,
}

/// Vocabulary entry with an English answer and up to two prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: String,
    pub en: String,
    pub ko: String,
    pub desc: String,
    pub source_id: String,
    pub source_name: String,
}

impl Term {
    /// Text shown for the given prompt type.
    pub fn prompt(&self, prompt_type: PromptType) -> &str {
        match prompt_type {
            PromptType::Ko => &self.ko,
            PromptType::Desc => &self.desc,
        }
    }

    /// Source bucket key, falling back to [`UNKNOWN_SOURCE`].
    pub fn source_key(&self) -> &str {
        if self.source_id.is_empty() {
            UNKNOWN_SOURCE
        } else {
            &self.source_id
        }
    }
}

/// Which text of a term is shown as the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptType {
    /// Korean meaning.
    Ko,
    /// Free-text description.
    Desc,
}

impl PromptType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ko => "ko",
            Self::Desc => "desc",
        }
    }

    /// Human-readable label for result listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ko => "meaning",
            Self::Desc => "description",
        }
    }
}

/// One presented question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub id: String,
    pub term_id: String,
    pub prompt_type: PromptType,
    pub prompt_text: String,
    pub answer: String,
    pub source_id: String,
    pub source_name: String,
}

/// Graded outcome of one quiz item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub quiz_id: String,
    pub term_id: String,
    pub prompt_type: PromptType,
    pub prompt_text: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub source_id: String,
    pub source_name: String,
}

/// Whether a round covers all terms or only the previous round's misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizMode {
    Normal,
    Retest,
}

impl Default for QuizMode {
    fn default() -> Self {
        Self::Normal
    }
}
