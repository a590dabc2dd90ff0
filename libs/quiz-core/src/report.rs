//! Result reporting for a finished round.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::RoundResult;
use crate::types::{AnswerRecord, QuizMode};

/// A wrong answer, flagged when the term was also missed last round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongEntry {
    #[serde(flatten)]
    pub record: AnswerRecord,
    pub twice_wrong: bool,
}

/// Display-ready summary of a round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub total: usize,
    pub correct_count: usize,
    pub wrong_count: usize,
    pub accuracy: f64,
    pub perfect: bool,
    /// Still missing answers after two or more retests.
    pub needs_consolidation: bool,
    pub correct: Vec<AnswerRecord>,
    pub wrong: Vec<WrongEntry>,
    pub twice_wrong: Vec<AnswerRecord>,
    pub can_retest: bool,
    pub retest_count: usize,
    pub retest_round: u32,
    pub mode: QuizMode,
}

impl RoundReport {
    pub fn new(result: &RoundResult) -> Self {
        let twice_ids: HashSet<&str> = result
            .twice_wrong
            .iter()
            .map(|r| r.term_id.as_str())
            .collect();

        let (correct, wrong): (Vec<&AnswerRecord>, Vec<&AnswerRecord>) =
            result.records.iter().partition(|r| r.is_correct);

        let total = result.records.len();
        let accuracy = if total == 0 {
            0.0
        } else {
            correct.len() as f64 / total as f64
        };

        Self {
            total,
            correct_count: correct.len(),
            wrong_count: wrong.len(),
            accuracy,
            perfect: total > 0 && wrong.is_empty(),
            needs_consolidation: result.round >= 2 && !wrong.is_empty(),
            correct: correct.into_iter().cloned().collect(),
            wrong: wrong
                .into_iter()
                .map(|r| WrongEntry {
                    twice_wrong: twice_ids.contains(r.term_id.as_str()),
                    record: r.clone(),
                })
                .collect(),
            twice_wrong: result.twice_wrong.clone(),
            can_retest: result.can_retest(),
            retest_count: result.retest_count(),
            retest_round: result.round,
            mode: result.mode,
        }
    }
}

fn write_record(f: &mut fmt::Formatter<'_>, index: usize, record: &AnswerRecord) -> fmt::Result {
    let answer = if record.user_answer.trim().is_empty() {
        "(no answer)"
    } else {
        record.user_answer.as_str()
    };
    writeln!(
        f,
        "{}. [{}] {}\n   yours: {}\n   answer: {}",
        index + 1,
        record.prompt_type.label(),
        record.prompt_text,
        answer,
        record.correct_answer
    )
}

impl fmt::Display for RoundReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Round {}: {} / {} correct ({:.0}%)",
            self.retest_round,
            self.correct_count,
            self.total,
            self.accuracy * 100.0
        )?;

        if self.perfect {
            writeln!(f, "Perfect round.")?;
        }
        if self.needs_consolidation {
            writeln!(f, "Still missing after repeated retests: review these before trying again.")?;
        }

        if !self.twice_wrong.is_empty() {
            writeln!(f, "\nMissed twice in a row ({}):", self.twice_wrong.len())?;
            for (i, record) in self.twice_wrong.iter().enumerate() {
                write_record(f, i, record)?;
            }
        }

        if !self.wrong.is_empty() {
            writeln!(f, "\nWrong ({}):", self.wrong_count)?;
            for (i, entry) in self.wrong.iter().enumerate() {
                write_record(f, i, &entry.record)?;
            }
        }

        if self.can_retest {
            writeln!(f, "\nRetest available for {} term(s).", self.retest_count)?;
        }
        Ok(())
    }
}
