//! Exam-question generation through the hosted model.

use serde::Deserialize;

use crate::models::{GenerateRequest, GeneratedQuestion, QuestionType};
use crate::services::llm::{LlmClient, LlmError};

/// Most terms forwarded in one request.
pub const MAX_TERMS: usize = 500;
/// Most characters of reference exam text forwarded.
pub const MAX_PAST_TEXT_CHARS: usize = 8000;

const SCHEMA_HINT: &str = r#"{"questions":[{"id":"string","type":"mcq | short","prompt":"string","choices":["string"],"answer":"string","explanation":"string","linkedTermIds":["string"],"difficulty":1,"examStyleTags":["string"]}]}"#;

#[derive(Debug, Deserialize)]
struct GeneratedBatch {
    #[serde(default)]
    questions: Vec<GeneratedQuestion>,
}

/// System instructions for the question author.
pub fn build_instructions(request: &GenerateRequest) -> String {
    format!(
        "You write medical terminology exam questions for medical students.\n\
         Use the given terms (English / Korean / description) and the optional past exam text \
         as a guide to tone and question style.\n\
         \n\
         Requirements:\n\
         - exactly {n} questions\n\
         - share of multiple-choice questions: {ratio}\n\
         - include choices only for mcq questions\n\
         - answer is the exact choice text for mcq, the expected string for short\n\
         - explanation is 1-3 sentences\n\
         - linkedTermIds must list at least one term id\n\
         - difficulty is 1, 2 or 3\n\
         - examStyleTags e.g. [\"definition\",\"abbrev\",\"prefix_suffix\",\"true_false\",\"fill_blank\",\"synonym\"]\n\
         Output JSON only. Schema: {schema}",
        n = request.config.n,
        ratio = request.config.ratio_mcq,
        schema = SCHEMA_HINT,
    )
}

/// Model input: term list, truncated past text and difficulty mix.
pub fn build_input(request: &GenerateRequest) -> String {
    let terms = request
        .terms
        .iter()
        .take(MAX_TERMS)
        .map(|t| format!("- ({}) {} | {} | {}", t.id, t.en, t.ko, t.desc))
        .collect::<Vec<_>>()
        .join("\n");

    let past_text: String = request
        .past_text
        .as_deref()
        .unwrap_or_default()
        .chars()
        .take(MAX_PAST_TEXT_CHARS)
        .collect();

    let mix = request.config.difficulty_mix.unwrap_or_default();

    format!(
        "[Terms]\n{}\n\n[Past exam text (optional)]\n{}\n\n[Difficulty mix]\n{{\"d1\":{},\"d2\":{},\"d3\":{}}}\n",
        terms, past_text, mix.d1, mix.d2, mix.d3
    )
}

/// Reject any question that breaks the schema contract.
pub fn validate(questions: &[GeneratedQuestion]) -> Result<(), LlmError> {
    for q in questions {
        if q.id.trim().is_empty() {
            return Err(LlmError::Invalid("question without id".to_string()));
        }
        if q.question_type == QuestionType::Mcq
            && q.choices.as_ref().map_or(0, |c| c.len()) < 2
        {
            return Err(LlmError::Invalid(format!(
                "mcq question {} needs at least two choices",
                q.id
            )));
        }
        if q.linked_term_ids.is_empty() {
            return Err(LlmError::Invalid(format!(
                "question {} is not linked to any term",
                q.id
            )));
        }
        if !(1..=3).contains(&q.difficulty) {
            return Err(LlmError::Invalid(format!(
                "question {} has difficulty {}",
                q.id, q.difficulty
            )));
        }
    }
    Ok(())
}

/// Ask the model for questions and validate the whole batch.
pub async fn generate(
    llm: &LlmClient,
    request: &GenerateRequest,
) -> Result<Vec<GeneratedQuestion>, LlmError> {
    let instructions = build_instructions(request);
    let input = build_input(request);

    let batch: GeneratedBatch = llm
        .complete_json(&llm.config().generate_model, &instructions, &input, '{')
        .await?;

    validate(&batch.questions)?;
    tracing::info!(count = batch.questions.len(), "questions generated");
    Ok(batch.questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DifficultyMix, GenerationConfig, TermInput};
    use pretty_assertions::assert_eq;

    fn request(term_count: usize, past_text: Option<String>) -> GenerateRequest {
        GenerateRequest {
            terms: (0..term_count)
                .map(|i| TermInput {
                    id: format!("t{i}"),
                    en: format!("term{i}"),
                    ko: "뜻".to_string(),
                    desc: String::new(),
                })
                .collect(),
            past_text,
            config: GenerationConfig {
                n: 10,
                ratio_mcq: 0.7,
                difficulty_mix: None,
            },
        }
    }

    fn question(id: &str, question_type: QuestionType, choices: Option<Vec<&str>>) -> GeneratedQuestion {
        GeneratedQuestion {
            id: id.to_string(),
            question_type,
            prompt: "What is it?".to_string(),
            choices: choices.map(|c| c.into_iter().map(String::from).collect()),
            answer: "a".to_string(),
            explanation: String::new(),
            linked_term_ids: vec!["t0".to_string()],
            difficulty: 2,
            exam_style_tags: vec![],
        }
    }

    #[test]
    fn input_caps_terms_and_past_text() {
        let input = build_input(&request(MAX_TERMS + 20, Some("가".repeat(MAX_PAST_TEXT_CHARS + 5))));

        assert_eq!(input.lines().filter(|l| l.starts_with("- (")).count(), MAX_TERMS);
        assert!(input.contains("- (t499) term499 | 뜻 | "));
        assert!(!input.contains("(t500)"));
        assert_eq!(input.matches('가').count(), MAX_PAST_TEXT_CHARS);
    }

    #[test]
    fn input_uses_default_difficulty_mix() {
        let input = build_input(&request(1, None));
        assert!(input.contains("{\"d1\":0.4,\"d2\":0.4,\"d3\":0.2}"));

        let mut custom = request(1, None);
        custom.config.difficulty_mix = Some(DifficultyMix { d1: 0.0, d2: 0.5, d3: 0.5 });
        assert!(build_input(&custom).contains("{\"d1\":0,\"d2\":0.5,\"d3\":0.5}"));
    }

    #[test]
    fn instructions_carry_config() {
        let text = build_instructions(&request(1, None));
        assert!(text.contains("exactly 10 questions"));
        assert!(text.contains("multiple-choice questions: 0.7"));
        assert!(text.contains("\"linkedTermIds\""));
    }

    #[test]
    fn validate_accepts_well_formed() {
        let questions = vec![
            question("q1", QuestionType::Mcq, Some(vec!["a", "b", "c"])),
            question("q2", QuestionType::Short, None),
        ];
        assert!(validate(&questions).is_ok());
    }

    #[test]
    fn validate_rejects_bad_questions() {
        let one_choice = question("q1", QuestionType::Mcq, Some(vec!["a"]));
        assert!(matches!(validate(&[one_choice]), Err(LlmError::Invalid(_))));

        let no_choices = question("q1", QuestionType::Mcq, None);
        assert!(matches!(validate(&[no_choices]), Err(LlmError::Invalid(_))));

        let mut unlinked = question("q1", QuestionType::Short, None);
        unlinked.linked_term_ids.clear();
        assert!(matches!(validate(&[unlinked]), Err(LlmError::Invalid(_))));

        let mut too_hard = question("q1", QuestionType::Short, None);
        too_hard.difficulty = 4;
        assert!(matches!(validate(&[too_hard]), Err(LlmError::Invalid(_))));
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"terms":[{"id":"t1","en":"angina"}],"pastText":"old exam","config":{"n":3,"ratioMcq":0.5,"difficultyMix":{"d1":0.2,"d2":0.3,"d3":0.5}}}"#,
        )
        .unwrap();
        assert_eq!(request.past_text.as_deref(), Some("old exam"));
        assert_eq!(request.config.ratio_mcq, 0.5);
        assert_eq!(
            request.config.difficulty_mix,
            Some(DifficultyMix { d1: 0.2, d2: 0.3, d3: 0.5 })
        );

        let snake = serde_json::from_str::<GenerateRequest>(
            r#"{"terms":[],"config":{"n":3,"ratio_mcq":0.5}}"#,
        );
        assert!(snake.is_err());
    }

    #[test]
    fn batch_parses_camel_case_schema() {
        let batch: GeneratedBatch = serde_json::from_str(
            r#"{"questions":[{"id":"q1","type":"mcq","prompt":"p","choices":["x","y"],"answer":"x","explanation":"e","linkedTermIds":["t1"],"difficulty":1,"examStyleTags":["definition"]}]}"#,
        )
        .unwrap();
        assert_eq!(batch.questions.len(), 1);
        assert_eq!(batch.questions[0].question_type, QuestionType::Mcq);
        assert_eq!(batch.questions[0].linked_term_ids, vec!["t1".to_string()]);
    }
}
