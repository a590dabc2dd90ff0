//! Core library for the medical-terminology quiz.
//!
//! Provides:
//! - CSV reader for term files (comma/semicolon/tab, optional header)
//! - Term store grouped by uploaded source
//! - Source-balanced quiz builder
//! - Answer grading (exact match after normalization)
//! - Session/retest state machine with twice-wrong tracking
//! - Round result reporting

pub mod builder;
pub mod error;
pub mod grader;
pub mod parser;
pub mod report;
pub mod session;
pub mod store;
pub mod types;

pub use builder::{build_quiz, candidates, duplication_warning, Candidate, DuplicationWarning};
pub use error::{ParseError, Result, SessionError, StoreError};
pub use grader::{grade, grade_item, normalize};
pub use parser::{parse, parse_rows, ParsedCsv};
pub use report::{RoundReport, WrongEntry};
pub use session::{ActiveRound, Event, Phase, Rejected, RoundResult, Session};
pub use store::{TermSource, TermStore};
pub use types::{AnswerRecord, PromptType, QuizItem, QuizMode, RawTerm, Term, UNKNOWN_SOURCE};
