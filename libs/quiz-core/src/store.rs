//! In-memory term store, grouped by uploaded source file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::{RawTerm, Term};

/// One uploaded file and the terms read from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSource {
    pub id: String,
    pub name: String,
    pub content_hash: String,
    pub added_at: DateTime<Utc>,
    pub terms: Vec<Term>,
}

/// All terms currently loaded, in upload order.
#[derive(Debug, Clone, Default)]
pub struct TermStore {
    sources: Vec<TermSource>,
}

impl TermStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach parsed rows to a new source.
    ///
    /// Term ids are `{source_id}_{row_index}`.
    pub fn add_source(
        &mut self,
        id: String,
        name: String,
        content_hash: String,
        raw_terms: Vec<RawTerm>,
    ) -> Result<&TermSource, StoreError> {
        if raw_terms.is_empty() {
            return Err(StoreError::NoTerms { name });
        }
        if self
            .sources
            .iter()
            .any(|s| s.name == name && s.content_hash == content_hash)
        {
            return Err(StoreError::DuplicateSource { name });
        }

        let terms = raw_terms
            .into_iter()
            .enumerate()
            .map(|(row, raw)| Term {
                id: format!("{}_{}", id, row),
                en: raw.en,
                ko: raw.ko,
                desc: raw.desc,
                source_id: id.clone(),
                source_name: name.clone(),
            })
            .collect();

        self.sources.push(TermSource {
            id,
            name,
            content_hash,
            added_at: Utc::now(),
            terms,
        });

        Ok(&self.sources[self.sources.len() - 1])
    }

    /// Remove a source and its terms. Returns false if the id is unknown.
    pub fn remove_source(&mut self, id: &str) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.id != id);
        self.sources.len() != before
    }

    pub fn clear(&mut self) {
        self.sources.clear();
    }

    pub fn sources(&self) -> &[TermSource] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&TermSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn all_terms(&self) -> Vec<Term> {
        self.sources
            .iter()
            .flat_map(|s| s.terms.iter().cloned())
            .collect()
    }

    pub fn term_count(&self) -> usize {
        self.sources.iter().map(|s| s.terms.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.term_count() == 0
    }
}
