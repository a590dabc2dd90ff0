//! Local grading of generated questions and hosted-model coaching notes.

use std::collections::HashMap;

use quiz_core::{grade, AnswerRecord};

use crate::models::{FeedbackNote, GeneratedQuestion, GradedAnswer, SubmittedAnswer};
use crate::services::llm::{LlmClient, LlmError};

/// Most wrong answers sent for coaching in one call.
pub const MAX_COACHED: usize = 30;

const INSTRUCTIONS: &str = "Output JSON only.";

/// Missed question as described to the coach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAnswer {
    pub question_id: String,
    pub prompt: String,
    pub answer: String,
    pub user_answer: String,
    pub explanation: String,
}

impl From<&AnswerRecord> for WrongAnswer {
    fn from(record: &AnswerRecord) -> Self {
        Self {
            question_id: record.quiz_id.clone(),
            prompt: record.prompt_text.clone(),
            answer: record.correct_answer.clone(),
            user_answer: record.user_answer.clone(),
            explanation: String::new(),
        }
    }
}

/// Grade answers against their questions. Unknown question ids are wrong.
pub fn grade_answers(
    questions: &[GeneratedQuestion],
    answers: &[SubmittedAnswer],
) -> Vec<GradedAnswer> {
    let by_id: HashMap<&str, &GeneratedQuestion> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    answers
        .iter()
        .map(|a| GradedAnswer {
            question_id: a.question_id.clone(),
            user_answer: a.user_answer.clone(),
            is_correct: by_id
                .get(a.question_id.as_str())
                .is_some_and(|q| grade(&a.user_answer, &q.answer)),
        })
        .collect()
}

/// Wrong answers that belong to a known question, capped at [`MAX_COACHED`].
pub fn wrong_answers(questions: &[GeneratedQuestion], results: &[GradedAnswer]) -> Vec<WrongAnswer> {
    let by_id: HashMap<&str, &GeneratedQuestion> =
        questions.iter().map(|q| (q.id.as_str(), q)).collect();

    results
        .iter()
        .filter(|r| !r.is_correct)
        .filter_map(|r| {
            by_id.get(r.question_id.as_str()).map(|q| WrongAnswer {
                question_id: r.question_id.clone(),
                prompt: q.prompt.clone(),
                answer: q.answer.clone(),
                user_answer: r.user_answer.clone(),
                explanation: q.explanation.clone(),
            })
        })
        .take(MAX_COACHED)
        .collect()
}

pub fn build_input(wrong: &[WrongAnswer]) -> String {
    let entries = wrong
        .iter()
        .map(|w| {
            format!(
                "- id={}\nQ: {}\nAnswer: {}\nMine: {}\nExplanation: {}",
                w.question_id, w.prompt, w.answer, w.user_answer, w.explanation
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "You are a wrong-answer notebook coach. For each questionId write, as one feedback text:\n\
         - why it was wrong, in 1-2 sentences\n\
         - one point that is easy to confuse\n\
         - one line on how to remember it next time\n\
         \n\
         Format (JSON only):\n\
         [{{\"questionId\":\"...\",\"feedback\":\"...\"}}]\n\
         \n\
         [Wrong answers]\n{}\n",
        entries
    )
}

/// Ask the coach about `wrong`. No call is made when nothing was missed.
pub async fn coach(llm: &LlmClient, wrong: &[WrongAnswer]) -> Result<Vec<FeedbackNote>, LlmError> {
    if wrong.is_empty() {
        return Ok(Vec::new());
    }
    let wrong = &wrong[..wrong.len().min(MAX_COACHED)];

    let notes: Vec<FeedbackNote> = llm
        .complete_json(
            &llm.config().feedback_model,
            INSTRUCTIONS,
            &build_input(wrong),
            '[',
        )
        .await?;

    tracing::info!(wrong = wrong.len(), notes = notes.len(), "coaching received");
    Ok(notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionType;
    use pretty_assertions::assert_eq;

    fn question(id: &str, answer: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            id: id.to_string(),
            question_type: QuestionType::Short,
            prompt: format!("prompt {id}"),
            choices: None,
            answer: answer.to_string(),
            explanation: format!("because {id}"),
            linked_term_ids: vec!["t".to_string()],
            difficulty: 1,
            exam_style_tags: vec![],
        }
    }

    fn submitted(id: &str, answer: &str) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: id.to_string(),
            user_answer: answer.to_string(),
        }
    }

    #[test]
    fn grades_with_normalization() {
        let questions = vec![question("q1", "Myocardial Infarction"), question("q2", "angina")];
        let results = grade_answers(
            &questions,
            &[
                submitted("q1", "  myocardial infarction "),
                submitted("q2", "stenosis"),
                submitted("q9", "anything"),
            ],
        );

        let flags: Vec<(&str, bool)> = results
            .iter()
            .map(|r| (r.question_id.as_str(), r.is_correct))
            .collect();
        assert_eq!(flags, vec![("q1", true), ("q2", false), ("q9", false)]);
    }

    #[test]
    fn wrong_answers_skip_unknown_and_cap() {
        let questions: Vec<GeneratedQuestion> =
            (0..40).map(|i| question(&format!("q{i}"), "x")).collect();
        let mut answers: Vec<SubmittedAnswer> =
            (0..40).map(|i| submitted(&format!("q{i}"), "y")).collect();
        answers.insert(0, submitted("ghost", "y"));

        let results = grade_answers(&questions, &answers);
        let wrong = wrong_answers(&questions, &results);

        assert_eq!(wrong.len(), MAX_COACHED);
        assert_eq!(wrong[0].question_id, "q0");
        assert_eq!(wrong[0].explanation, "because q0");
    }

    #[test]
    fn input_lists_each_miss() {
        let wrong = vec![WrongAnswer {
            question_id: "q1".to_string(),
            prompt: "Inflammation of the liver?".to_string(),
            answer: "hepatitis".to_string(),
            user_answer: "nephritis".to_string(),
            explanation: String::new(),
        }];
        let input = build_input(&wrong);
        assert!(input.contains("- id=q1\nQ: Inflammation of the liver?\nAnswer: hepatitis\nMine: nephritis"));
        assert!(input.contains("[{\"questionId\":\"...\",\"feedback\":\"...\"}]"));
    }

    #[test]
    fn wrong_answer_from_record() {
        let record = AnswerRecord {
            quiz_id: "s_0:ko#1".to_string(),
            term_id: "s_0".to_string(),
            prompt_type: quiz_core::PromptType::Ko,
            prompt_text: "협심증".to_string(),
            user_answer: "angia".to_string(),
            correct_answer: "angina".to_string(),
            is_correct: false,
            source_id: "s".to_string(),
            source_name: "s.csv".to_string(),
        };
        let wrong = WrongAnswer::from(&record);
        assert_eq!(wrong.question_id, "s_0:ko#1");
        assert_eq!(wrong.answer, "angina");
    }
}
