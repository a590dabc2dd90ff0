//! Turning uploaded CSV text into a term source.

use quiz_core::{parse_rows, TermSource, TermStore};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::Result;

/// Compute SHA256 hash of content
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A stored upload and the rows that did not make it in.
#[derive(Debug)]
pub struct Ingested<'a> {
    pub source: &'a TermSource,
    pub skipped_lines: Vec<usize>,
}

/// Parse `content` and add it to `store` as a new source.
///
/// Fails without touching the store if the file is empty, has no usable rows,
/// or was already uploaded under the same name with the same content.
pub fn ingest<'a>(store: &'a mut TermStore, name: &str, content: &str) -> Result<Ingested<'a>> {
    let parsed = parse_rows(content)?;
    let hash = hash_content(content);
    let id = Uuid::new_v4().to_string();

    let source = store.add_source(id, name.trim().to_string(), hash, parsed.terms)?;
    if !parsed.skipped_lines.is_empty() {
        tracing::warn!(
            name = %source.name,
            lines = ?parsed.skipped_lines,
            "rows without an English term were skipped"
        );
    }
    tracing::info!(
        source_id = %source.id,
        name = %source.name,
        terms = source.terms.len(),
        "source added"
    );
    Ok(Ingested {
        source,
        skipped_lines: parsed.skipped_lines,
    })
}
