//! Template rendering engine.
//!
//! Turns a document type's template plus an answer set into final text.

use chrono::NaiveDate;
use std::borrow::Cow;
use std::collections::HashMap;

use super::common::format_long_date;
use super::template;
use crate::catalog::{DocumentType, Question};
use crate::session::answers::AnswerStore;

/// Token filled with the generation date.
pub const DATE_TOKEN: &str = "DATE";

/// Tokens the engine fills without a question.
pub const SYSTEM_TOKENS: &[&str] = &[DATE_TOKEN];

/// Marker rendered in place of a required variable that has no answer.
pub fn missing_sentinel(variable: &str) -> String {
    format!("[{variable} - REQUIRED]")
}

/// Stateless engine for rendering templates to text.
pub struct TemplateRenderEngine;

impl TemplateRenderEngine {
    /// Render `document_type`'s template.
    ///
    /// * `[DATE]` becomes `now` in long form.
    /// * An answered question's variable becomes the answer, byte for byte.
    /// * An unanswered required question's variable becomes `[VAR - REQUIRED]`.
    /// * Unanswered optional variables and unknown tokens stay as written.
    ///
    /// When several questions share a variable, the first one in list order
    /// that yields a value wins. A system token can't be overridden by a
    /// question.
    pub fn render(
        document_type: &DocumentType,
        questions: &[Question],
        answers: &AnswerStore,
        now: NaiveDate,
    ) -> String {
        let mut values: HashMap<&str, Cow<'_, str>> = HashMap::new();
        values.insert(DATE_TOKEN, Cow::Owned(format_long_date(now)));

        for question in questions {
            let variable = question.template_variable.as_str();
            if values.contains_key(variable) {
                continue;
            }

            if let Some(answer) = answers.get_answer(&question.id) {
                values.insert(variable, Cow::Borrowed(answer));
            } else if question.required {
                values.insert(variable, Cow::Owned(missing_sentinel(variable)));
            }
        }

        template::substitute(&document_type.template, |name| {
            values.get(name).map(|value| value.as_ref())
        })
    }
}
