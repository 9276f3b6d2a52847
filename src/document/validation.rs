//! Required-answer validation.
//!
//! `missing_required` is the single gate used by both the review step and
//! strict generation. The error types turn its result into messages that
//! can be shown to the user as-is.

use std::fmt;

use crate::catalog::Question;
use crate::session::answers::AnswerStore;

/// Whether a stored value counts as "not answered".
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Required questions whose answer is absent or blank, in input order.
pub fn missing_required<'q>(questions: &'q [Question], answers: &AnswerStore) -> Vec<&'q Question> {
    questions
        .iter()
        .filter(|question| question.required)
        .filter(|question| answers.get_answer(&question.id).map_or(true, is_blank))
        .collect()
}

/// Validation error with a user-friendly message.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Question the error belongs to
    pub field: String,
    pub message: String,
    /// Suggestion for how to fix the error
    pub suggestion: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Error for a required question left unanswered.
    pub fn unanswered(question: &Question) -> Self {
        let error = Self::new(
            question.id.clone(),
            format!("\"{}\" is required", question.prompt),
        );
        match &question.placeholder {
            Some(hint) => error.with_suggestion(format!("Please provide an answer ({hint})")),
            None => error.with_suggestion("Please provide an answer"),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, ". {}", suggestion)?;
        }
        Ok(())
    }
}

/// Collection of validation errors with formatted output.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// One error per missing required question.
    pub fn from_missing(missing: &[&Question]) -> Self {
        Self {
            errors: missing.iter().map(|q| ValidationError::unanswered(q)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Ids of the questions with errors, in order.
    pub fn fields(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.field.clone()).collect()
    }

    /// Multi-line message listing every error.
    pub fn to_message(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut parts = vec![format!(
            "Validation failed: {} required question(s) unanswered\n",
            self.errors.len()
        )];

        for (i, error) in self.errors.iter().enumerate() {
            parts.push(format!("{}. {}", i + 1, error));
        }

        parts.push(String::new());
        parts.push("Please answer the questions above and try again.".to_string());

        parts.join("\n")
    }
}
