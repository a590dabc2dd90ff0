//! Quiz session and retest state machine.
//!
//! A [`Session`] is a plain value. [`Session::apply`] consumes it together
//! with an [`Event`] and returns the next session. A refused event returns
//! the session unchanged inside [`Rejected`], so callers hold exactly one
//! authoritative state and never lose it to a bad request.
//!
//! ```text
//! Idle --Start--> Active --Submit (last)--> Finished --Retest--> Active
//!   ^                                          |
//!   +------------------Restart-----------------+
//! ```
//!
//! Each `Submit` grades the current item and appends its record in the same
//! transition. A round is finalized from that record list once it holds one
//! record per item, so the last answer is always part of the result.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::build_quiz;
use crate::error::SessionError;
use crate::grader::grade_item;
use crate::types::{AnswerRecord, QuizItem, QuizMode, Term};

/// User action driving the session.
#[derive(Debug, Clone)]
pub enum Event {
    Start {
        terms: Vec<Term>,
        question_count: usize,
    },
    Submit {
        answer: String,
    },
    Retest,
    Restart,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start a quiz",
            Self::Submit { .. } => "submit an answer",
            Self::Retest => "retest",
            Self::Restart => "restart",
        }
    }
}

/// Round in progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveRound {
    items: Vec<QuizItem>,
    records: Vec<AnswerRecord>,
}

impl ActiveRound {
    fn new(items: Vec<QuizItem>) -> Self {
        Self {
            items,
            records: Vec::new(),
        }
    }

    /// Item waiting for an answer.
    pub fn current(&self) -> Option<&QuizItem> {
        self.items.get(self.records.len())
    }

    /// Zero-based index of the current item.
    pub fn position(&self) -> usize {
        self.records.len()
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }
}

/// Outcome of a completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub round: u32,
    pub mode: QuizMode,
    pub records: Vec<AnswerRecord>,
    /// Wrong records whose term was also wrong in the previous round.
    pub twice_wrong: Vec<AnswerRecord>,
    /// Distinct wrong term ids, in order of first miss.
    pub wrong_term_ids: Vec<String>,
}

impl RoundResult {
    /// Summarize `records` against the previous round's wrong term ids.
    pub fn finalize(
        round: u32,
        mode: QuizMode,
        records: Vec<AnswerRecord>,
        previous_wrong: &HashSet<String>,
    ) -> Self {
        let mut wrong_term_ids = Vec::new();
        let mut seen = HashSet::new();
        for record in records.iter().filter(|r| !r.is_correct) {
            if seen.insert(record.term_id.as_str()) {
                wrong_term_ids.push(record.term_id.clone());
            }
        }

        let twice_wrong = records
            .iter()
            .filter(|r| !r.is_correct && previous_wrong.contains(&r.term_id))
            .cloned()
            .collect();

        Self {
            round,
            mode,
            records,
            twice_wrong,
            wrong_term_ids,
        }
    }

    pub fn wrong_records(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.records.iter().filter(|r| !r.is_correct)
    }

    pub fn can_retest(&self) -> bool {
        !self.wrong_term_ids.is_empty()
    }

    /// Number of terms a retest would cover.
    pub fn retest_count(&self) -> usize {
        self.wrong_term_ids.len()
    }
}

/// Where the session currently is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Active(ActiveRound),
    Finished(RoundResult),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "no quiz is running",
            Self::Active(_) => "a round is in progress",
            Self::Finished(_) => "a round is finished",
        }
    }
}

/// Quiz session across a chain of rounds.
#[derive(Debug, Clone)]
pub struct Session {
    mode: QuizMode,
    round: u32,
    pool: Vec<Term>,
    previous_wrong: HashSet<String>,
    phase: Phase,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: QuizMode::Normal,
            round: 0,
            pool: Vec::new(),
            previous_wrong: HashSet::new(),
            phase: Phase::Idle,
        }
    }
}

/// An event the session refused, with the session it was applied to.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    pub session: Session,
    pub error: SessionError,
}

impl From<Rejected> for SessionError {
    fn from(rejected: Rejected) -> Self {
        rejected.error
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the session that follows `event`.
    ///
    /// A refused event hands the unchanged session back inside [`Rejected`].
    pub fn apply<R: Rng + ?Sized>(mut self, event: Event, rng: &mut R) -> Result<Self, Rejected> {
        let invalid = SessionError::InvalidTransition {
            event: event.name(),
            phase: self.phase.name(),
        };

        match event {
            Event::Start {
                terms,
                question_count,
            } if matches!(self.phase, Phase::Idle) => {
                let items = build_quiz(&terms, question_count, rng);
                if items.is_empty() {
                    return Err(self.reject(SessionError::NoQuestions));
                }
                Ok(Self {
                    mode: QuizMode::Normal,
                    round: 0,
                    pool: terms,
                    previous_wrong: HashSet::new(),
                    phase: Phase::Active(ActiveRound::new(items)),
                })
            }

            Event::Submit { answer } => {
                let mut round = match std::mem::replace(&mut self.phase, Phase::Idle) {
                    Phase::Active(round) => round,
                    phase => {
                        self.phase = phase;
                        return Err(self.reject(invalid));
                    }
                };
                let Some(item) = round.current() else {
                    self.phase = Phase::Active(round);
                    return Err(self.reject(invalid));
                };
                let record = grade_item(item, &answer);
                round.records.push(record);

                self.phase = if round.records.len() == round.items.len() {
                    Phase::Finished(RoundResult::finalize(
                        self.round,
                        self.mode,
                        round.records,
                        &self.previous_wrong,
                    ))
                } else {
                    Phase::Active(round)
                };
                Ok(self)
            }

            Event::Retest => {
                let Phase::Finished(result) = &self.phase else {
                    return Err(self.reject(invalid));
                };
                if !result.can_retest() {
                    return Err(self.reject(SessionError::NothingToRetest));
                }

                let by_id: HashMap<&str, &Term> =
                    self.pool.iter().map(|t| (t.id.as_str(), t)).collect();
                let pool: Vec<Term> = result
                    .wrong_term_ids
                    .iter()
                    .filter_map(|id| by_id.get(id.as_str()).map(|t| (*t).clone()))
                    .collect();

                let items = build_quiz(&pool, pool.len(), rng);
                if items.is_empty() {
                    return Err(self.reject(SessionError::NoQuestions));
                }

                Ok(Self {
                    mode: QuizMode::Retest,
                    round: self.round + 1,
                    pool,
                    previous_wrong: result.wrong_term_ids.iter().cloned().collect(),
                    phase: Phase::Active(ActiveRound::new(items)),
                })
            }

            Event::Restart if !self.is_active() => Ok(Self::new()),

            _ => Err(self.reject(invalid)),
        }
    }

    fn reject(self, error: SessionError) -> Rejected {
        Rejected {
            session: self,
            error,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    /// Zero for the first pass, incremented by each retest.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Terms the current round was built from.
    pub fn pool(&self) -> &[Term] {
        &self.pool
    }

    /// Wrong term ids of the round before the current one.
    pub fn previous_wrong(&self) -> &HashSet<String> {
        &self.previous_wrong
    }

    pub fn active(&self) -> Option<&ActiveRound> {
        match &self.phase {
            Phase::Active(active) => Some(active),
            _ => None,
        }
    }

    pub fn result(&self) -> Option<&RoundResult> {
        match &self.phase {
            Phase::Finished(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active(_))
    }

    /// Most recently graded record of the current or just-finished round.
    pub fn last_record(&self) -> Option<&AnswerRecord> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Active(active) => active.records.last(),
            Phase::Finished(result) => result.records.last(),
        }
    }
}
