//! Quiz builder.
//!
//! Turns an unordered term pool into a question sequence that is balanced
//! across source files. Sources are visited round-robin so a large file
//! cannot crowd out a small one. Within a source every term is asked once
//! (with a randomly chosen prompt) before any term is asked with its other
//! prompt. A source keeps its turn for as long as it has any fresh
//! candidate, and only when every source has run out are the per-source
//! pools reshuffled and reused.

use std::collections::{HashMap, HashSet, VecDeque};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{PromptType, QuizItem, Term};

/// A possible question: one term asked with one prompt type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub term: &'a Term,
    pub prompt_type: PromptType,
}

impl Candidate<'_> {
    fn into_item(self, position: usize) -> QuizItem {
        let term = self.term;
        QuizItem {
            id: format!("{}:{}#{}", term.id, self.prompt_type.as_str(), position),
            term_id: term.id.clone(),
            prompt_type: self.prompt_type,
            prompt_text: term.prompt(self.prompt_type).trim().to_string(),
            answer: term.en.trim().to_string(),
            source_id: term.source_id.clone(),
            source_name: term.source_name.clone(),
        }
    }
}

/// All candidates a term can produce.
///
/// A prompt type is only offered when its text is non-empty, and a term
/// without an English answer produces nothing.
pub fn candidates(term: &Term) -> Vec<Candidate<'_>> {
    if term.en.trim().is_empty() {
        return Vec::new();
    }

    [PromptType::Ko, PromptType::Desc]
        .into_iter()
        .filter(|&prompt_type| !term.prompt(prompt_type).trim().is_empty())
        .map(|prompt_type| Candidate { term, prompt_type })
        .collect()
}

/// Candidate pools for one source file.
struct SourceGroup<'a> {
    all: Vec<Candidate<'a>>,
    /// Unasked candidates: one per term first, then the other prompt types.
    fresh: VecDeque<Candidate<'a>>,
    refill: VecDeque<Candidate<'a>>,
}

impl<'a> SourceGroup<'a> {
    fn new<R: Rng + ?Sized>(terms: &[&'a Term], rng: &mut R) -> Self {
        let mut all = Vec::new();
        let mut primary = Vec::new();
        let mut alternate = Vec::new();

        for term in terms {
            let mut pool = candidates(term);
            pool.shuffle(rng);
            all.extend(pool.iter().copied());

            let mut pool = pool.into_iter();
            primary.extend(pool.next());
            alternate.extend(pool);
        }

        primary.shuffle(rng);
        alternate.shuffle(rng);
        primary.append(&mut alternate);

        Self {
            all,
            fresh: primary.into(),
            refill: VecDeque::new(),
        }
    }

    /// Draw from a freshly reshuffled copy of the whole pool.
    fn next_refill<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Candidate<'a>> {
        if self.refill.is_empty() {
            let mut pool = self.all.clone();
            pool.shuffle(rng);
            self.refill = pool.into();
        }
        self.refill.pop_front()
    }
}

/// Take one candidate per group per pass until `desired` is reached or no
/// group yields anything.
fn round_robin<'a, F>(
    groups: &mut [SourceGroup<'a>],
    order: &[usize],
    out: &mut Vec<Candidate<'a>>,
    desired: usize,
    mut take: F,
) where
    F: FnMut(&mut SourceGroup<'a>) -> Option<Candidate<'a>>,
{
    loop {
        let mut progressed = false;
        for &idx in order {
            if out.len() >= desired {
                return;
            }
            if let Some(candidate) = take(&mut groups[idx]) {
                out.push(candidate);
                progressed = true;
            }
        }
        if !progressed {
            return;
        }
    }
}

/// Build a quiz of `desired_count` questions (at least one) from `terms`.
///
/// Returns an empty sequence only when no term can produce a question.
/// Duplicates appear only when `desired_count` exceeds the number of
/// distinct candidates, and are spread across sources.
pub fn build_quiz<R: Rng + ?Sized>(
    terms: &[Term],
    desired_count: usize,
    rng: &mut R,
) -> Vec<QuizItem> {
    let desired = desired_count.max(1);

    let mut seen_ids = HashSet::new();
    let mut group_index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<Vec<&Term>> = Vec::new();

    for term in terms {
        if !term.id.is_empty() && !seen_ids.insert(term.id.as_str()) {
            continue;
        }
        let idx = *group_index.entry(term.source_key()).or_insert_with(|| {
            grouped.push(Vec::new());
            grouped.len() - 1
        });
        grouped[idx].push(term);
    }

    let mut groups: Vec<SourceGroup<'_>> = grouped
        .iter()
        .map(|terms| SourceGroup::new(terms, rng))
        .filter(|group| !group.all.is_empty())
        .collect();

    if groups.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.shuffle(rng);

    let mut picked = Vec::with_capacity(desired);
    round_robin(&mut groups, &order, &mut picked, desired, |g| g.fresh.pop_front());
    round_robin(&mut groups, &order, &mut picked, desired, |g| g.next_refill(rng));

    picked.shuffle(rng);

    picked
        .into_iter()
        .enumerate()
        .map(|(position, candidate)| candidate.into_item(position))
        .collect()
}

/// Notice shown when the requested count forces repeated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicationWarning {
    /// More questions than terms.
    Repeats,
    /// More questions than twice the terms.
    HeavyRepeats,
}

impl DuplicationWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Repeats => "more questions than terms; some terms will be asked twice",
            Self::HeavyRepeats => {
                "more questions than meaning/description prompts; expect many repeats"
            }
        }
    }
}

/// Warning for a requested question count, if any.
pub fn duplication_warning(term_count: usize, question_count: usize) -> Option<DuplicationWarning> {
    if term_count == 0 {
        None
    } else if question_count > term_count * 2 {
        Some(DuplicationWarning::HeavyRepeats)
    } else if question_count > term_count {
        Some(DuplicationWarning::Repeats)
    } else {
        None
    }
}
