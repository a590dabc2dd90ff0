//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use quiz_core::{AnswerRecord, PromptType, QuizItem, QuizMode, RoundReport, TermSource};

// === Sources ===

/// Uploaded file without its term list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: String,
    pub name: String,
    pub content_hash: String,
    pub term_count: usize,
    pub added_at: DateTime<Utc>,
}

impl From<&TermSource> for SourceSummary {
    fn from(source: &TermSource) -> Self {
        Self {
            id: source.id.clone(),
            name: source.name.clone(),
            content_hash: source.content_hash.clone(),
            term_count: source.terms.len(),
            added_at: source.added_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SourceListResponse {
    pub sources: Vec<SourceSummary>,
    pub term_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadSourceRequest {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadSourceResponse {
    pub source: SourceSummary,
    /// CSV lines dropped for an empty English cell.
    pub skipped_lines: Vec<usize>,
    pub term_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteSourcesResponse {
    pub removed: usize,
}

// === Quiz ===

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StartQuizRequest {
    #[serde(default)]
    pub question_count: Option<usize>,
}

/// Question as shown to the user; the answer stays on the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt_type: PromptType,
    pub prompt_text: String,
    pub source_name: String,
    /// 1-based position in the round.
    pub number: usize,
    pub total: usize,
}

impl QuestionView {
    pub fn new(item: &QuizItem, position: usize, total: usize) -> Self {
        Self {
            id: item.id.clone(),
            prompt_type: item.prompt_type,
            prompt_text: item.prompt_text.clone(),
            source_name: item.source_name.clone(),
            number: position + 1,
            total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartQuizResponse {
    pub mode: QuizMode,
    pub round: u32,
    pub total: usize,
    pub question: QuestionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub record: AnswerRecord,
    pub finished: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RoundReport>,
}

/// Snapshot of the quiz for `GET /api/quiz/current`
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuizStatus {
    Idle {
        term_count: usize,
    },
    Active {
        mode: QuizMode,
        round: u32,
        question: QuestionView,
        answered: usize,
    },
    Finished {
        report: RoundReport,
    },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub notebook: Vec<FeedbackNote>,
}

// === Hosted-model generation ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermInput {
    pub id: String,
    pub en: String,
    #[serde(default)]
    pub ko: String,
    #[serde(default)]
    pub desc: String,
}

/// Target share of each difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyMix {
    pub d1: f64,
    pub d2: f64,
    pub d3: f64,
}

impl Default for DifficultyMix {
    fn default() -> Self {
        Self {
            d1: 0.4,
            d2: 0.4,
            d3: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub n: usize,
    pub ratio_mcq: f64,
    #[serde(default)]
    pub difficulty_mix: Option<DifficultyMix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub terms: Vec<TermInput>,
    #[serde(default)]
    pub past_text: Option<String>,
    pub config: GenerationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Short,
}

/// Exam question authored by the hosted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    pub linked_term_ids: Vec<String>,
    pub difficulty: u8,
    #[serde(default)]
    pub exam_style_tags: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub questions: Vec<GeneratedQuestion>,
}

// === Grading and coaching ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub user_answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub questions: Vec<GeneratedQuestion>,
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub question_id: String,
    pub user_answer: String,
    pub is_correct: bool,
}

/// Coaching note for one missed question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackNote {
    pub question_id: String,
    pub feedback: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GradeResponse {
    pub results: Vec<GradedAnswer>,
    pub notebook: Vec<FeedbackNote>,
}
