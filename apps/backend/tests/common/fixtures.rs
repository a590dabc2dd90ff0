//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Comma-separated file with a header and three columns.
pub const CARDIO_CSV: &str = "en,ko,desc\n\
angina,협심증,Chest pain caused by reduced blood flow to the heart\n\
stenosis,협착,\n\
tachycardia,빈맥,Heart rate above 100 beats per minute\n";

/// Semicolon-separated file using alias headers and no description column.
pub const RENAL_CSV: &str = "term_en;meaning_ko\nnephritis;신장염\ncystitis;방광염\n";

/// (en, ko, desc) for every fixture term.
const TERMS: &[(&str, &str, &str)] = &[
    ("angina", "협심증", "Chest pain caused by reduced blood flow to the heart"),
    ("stenosis", "협착", ""),
    ("tachycardia", "빈맥", "Heart rate above 100 beats per minute"),
    ("nephritis", "신장염", ""),
    ("cystitis", "방광염", ""),
];

/// English answer for a prompt taken from the fixture files.
///
/// # Panics
/// Panics if the prompt does not belong to any fixture term.
pub fn answer_for(prompt: &str) -> &'static str {
    TERMS
        .iter()
        .find(|(_, ko, desc)| *ko == prompt || (!desc.is_empty() && *desc == prompt))
        .map(|(en, _, _)| *en)
        .unwrap_or_else(|| panic!("unknown prompt: {prompt}"))
}

/// A generated question in the hosted model's schema.
pub fn generated_question(id: &str, kind: &str, answer: &str) -> Value {
    let mut question = json!({
        "id": id,
        "type": kind,
        "prompt": format!("Which term matches {id}?"),
        "answer": answer,
        "explanation": "Explained.",
        "linkedTermIds": ["t1"],
        "difficulty": 2,
        "examStyleTags": ["definition"]
    });
    if kind == "mcq" {
        question["choices"] = json!([answer, "distractor"]);
    }
    question
}

/// Request body for `/api/generate`.
pub fn generate_request(term_count: usize) -> Value {
    let terms: Vec<Value> = (0..term_count)
        .map(|i| json!({ "id": format!("t{i}"), "en": format!("term{i}"), "ko": "뜻", "desc": "" }))
        .collect();
    json!({
        "terms": terms,
        "pastText": "1. Which of the following means inflammation?",
        "config": { "n": 2, "ratioMcq": 0.5 }
    })
}
