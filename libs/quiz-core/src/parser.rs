//! CSV parser for term files.
//!
//! # Format
//! ```text
//! en,ko,desc
//! abduction,벌림,"Movement away from the midline"
//! adduction,모음,
//! ```
//!
//! Comma, semicolon and tab delimiters are detected from the first line.
//! The header row is optional; without one the first three columns are read
//! as `en`, `ko`, `desc`.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{ParseError, Result};
use crate::types::RawTerm;

const EN_ALIASES: &[&str] = &["en", "term_en", "english"];
const KO_ALIASES: &[&str] = &["ko", "meaning_ko", "korean"];
const DESC_ALIASES: &[&str] = &["desc", "explain", "description"];

/// Terms read from one file, plus the data rows that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCsv {
    pub terms: Vec<RawTerm>,
    /// 1-based line numbers of rows skipped for an empty `en` cell.
    pub skipped_lines: Vec<usize>,
}

/// Parse CSV content into raw terms.
pub fn parse(content: &str) -> Result<Vec<RawTerm>> {
    parse_rows(content).map(|parsed| parsed.terms)
}

/// Parse CSV content, keeping track of skipped rows.
pub fn parse_rows(content: &str) -> Result<ParsedCsv> {
    let text = normalize_text(content);
    let Some(first_line) = text.lines().find(|line| !line.trim().is_empty()) else {
        return Err(ParseError::EmptyFile);
    };

    let delimiter = detect_delimiter(first_line);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows.push((line_of(&record), record.iter().map(str::to_string).collect()));
    }

    let Some((_, first_cols)) = rows.first() else {
        return Err(ParseError::EmptyFile);
    };
    let layout = Columns::detect(first_cols);
    let skip = usize::from(layout.has_header);

    let mut parsed = ParsedCsv {
        terms: Vec::new(),
        skipped_lines: Vec::new(),
    };
    for (line_number, cols) in rows.iter().skip(skip) {
        match layout.read(cols, *line_number) {
            Some(term) => parsed.terms.push(term),
            None => parsed.skipped_lines.push(*line_number),
        }
    }

    if parsed.terms.is_empty() {
        return Err(ParseError::NoTerms);
    }
    Ok(parsed)
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map_or(0, |pos| pos.line() as usize)
}

/// Strip a UTF-8 BOM and unify line endings.
fn normalize_text(raw: &str) -> String {
    raw.strip_prefix('\u{feff}')
        .unwrap_or(raw)
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Pick the delimiter by frequency in the header line.
pub fn detect_delimiter(line: &str) -> char {
    let count = |c: char| line.chars().filter(|&ch| ch == c).count();
    let comma = count(',');
    let semi = count(';');
    let tab = count('\t');

    if tab > 0 && tab >= comma && tab >= semi {
        '\t'
    } else if semi > 0 && semi >= comma {
        ';'
    } else {
        ','
    }
}

fn normalize_header(cell: &str) -> String {
    cell.trim().trim_start_matches('\u{feff}').to_lowercase()
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

/// Column positions for each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    has_header: bool,
    en: usize,
    ko: Option<usize>,
    desc: Option<usize>,
}

impl Columns {
    fn detect(first_row: &[String]) -> Self {
        let headers: Vec<String> = first_row.iter().map(|c| normalize_header(c)).collect();
        let looks_like_header = headers.iter().any(|h| {
            EN_ALIASES.contains(&h.as_str())
                || KO_ALIASES.contains(&h.as_str())
                || DESC_ALIASES.contains(&h.as_str())
        });

        if !looks_like_header {
            return Self {
                has_header: false,
                en: 0,
                ko: Some(1),
                desc: Some(2),
            };
        }

        Self {
            has_header: true,
            en: find_column(&headers, EN_ALIASES).unwrap_or(0),
            ko: find_column(&headers, KO_ALIASES),
            desc: find_column(&headers, DESC_ALIASES),
        }
    }

    fn read(&self, cols: &[String], line_number: usize) -> Option<RawTerm> {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| cols.get(i))
                .cloned()
                .unwrap_or_default()
        };

        let en = field(Some(self.en));
        if en.is_empty() {
            return None;
        }

        Some(RawTerm {
            en,
            ko: field(self.ko),
            desc: field(self.desc),
            line_number,
        })
    }
}
