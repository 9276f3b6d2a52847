use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use utoipa::ToSchema;

use crate::catalog::Question;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    #[schema(example = "18")]
    pub question_id: String,
    #[schema(example = "Acme Corporation")]
    pub value: String,
}

/// Current answers of one document-creation session, keyed by question id.
///
/// Values are stored exactly as given. Checking them against the question
/// is the validator's job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    answers: HashMap<String, String>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; the last write wins.
    pub fn set_answer(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.insert(question_id.into(), value.into());
    }

    pub fn get_answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    /// Remove every answer, whichever document type it belonged to.
    pub fn clear_answers(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    /// Answers in the order their questions are asked. Answers to questions
    /// outside `questions` follow, sorted by id.
    pub fn ordered(&self, questions: &[Question]) -> Vec<Answer> {
        let mut seen = HashSet::new();
        let mut ordered: Vec<Answer> = questions
            .iter()
            .filter(|question| seen.insert(question.id.as_str()))
            .filter_map(|question| {
                self.answers.get(&question.id).map(|value| Answer {
                    question_id: question.id.clone(),
                    value: value.clone(),
                })
            })
            .collect();

        let mut rest: Vec<Answer> = self
            .answers
            .iter()
            .filter(|(question_id, _)| !seen.contains(question_id.as_str()))
            .map(|(question_id, value)| Answer {
                question_id: question_id.clone(),
                value: value.clone(),
            })
            .collect();
        rest.sort_by(|a, b| a.question_id.cmp(&b.question_id));

        ordered.extend(rest);
        ordered
    }
}
