//! Error types for quiz-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while reading a term CSV.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty file")]
    EmptyFile,

    #[error("no terms found (expected an en,ko,desc header or terms in columns 1-3)")]
    NoTerms,

    #[error("invalid CSV at line {line}: {message}")]
    Csv { line: usize, message: String },
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::Csv {
            line: err.position().map_or(0, |pos| pos.line() as usize),
            message: err.to_string(),
        }
    }
}

/// Errors raised by the term store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("file {name} is already uploaded")]
    DuplicateSource { name: String },

    #[error("file {name} contains no terms")]
    NoTerms { name: String },
}

/// Errors raised by session transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {event} while {phase}")]
    InvalidTransition {
        event: &'static str,
        phase: &'static str,
    },

    #[error("no questions could be built from the loaded terms")]
    NoQuestions,

    #[error("there are no wrong answers to retest")]
    NothingToRetest,
}
