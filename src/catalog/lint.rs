//! Consistency checks for catalog definitions.
//!
//! Findings are configuration defects. They are logged at startup and never
//! stop the generator, which renders unmatched tokens literally.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

use super::model::{DocumentType, Question};
use crate::document::engine::SYSTEM_TOKENS;
use crate::document::template;

lazy_static! {
    static ref TOKEN_NAME: Regex = Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid token regex");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// Template token that is neither a question variable nor a system token.
    UnmatchedToken { document_type_id: String, token: String },
    /// Question variable that never appears in the template.
    UnusedVariable { document_type_id: String, question_id: String, variable: String },
    /// Variable that is not upper-snake-case.
    NonConventionalVariable { document_type_id: String, question_id: String, variable: String },
    MissingOptions { document_type_id: String, question_id: String },
    DuplicateQuestionId { document_type_id: String, question_id: String },
    QuestionCountMismatch { document_type_id: String, declared: usize, actual: usize },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::UnmatchedToken { document_type_id, token } => write!(
                f,
                "[{document_type_id}] template token [{token}] has no question and is not a system token"
            ),
            CatalogIssue::UnusedVariable { document_type_id, question_id, variable } => write!(
                f,
                "[{document_type_id}] question {question_id} fills [{variable}] which is absent from the template"
            ),
            CatalogIssue::NonConventionalVariable { document_type_id, question_id, variable } => write!(
                f,
                "[{document_type_id}] question {question_id} variable '{variable}' is not UPPER_SNAKE_CASE"
            ),
            CatalogIssue::MissingOptions { document_type_id, question_id } => write!(
                f,
                "[{document_type_id}] single-select question {question_id} has no options"
            ),
            CatalogIssue::DuplicateQuestionId { document_type_id, question_id } => write!(
                f,
                "[{document_type_id}] question id {question_id} is used more than once"
            ),
            CatalogIssue::QuestionCountMismatch { document_type_id, declared, actual } => write!(
                f,
                "[{document_type_id}] declares {declared} questions but lists {actual}"
            ),
        }
    }
}

pub(crate) fn lint_document_type(document_type: &DocumentType, questions: &[Question]) -> Vec<CatalogIssue> {
    let doc_id = &document_type.id;
    let mut issues = Vec::new();

    let tokens: HashSet<&str> = template::tokens(&document_type.template).collect();
    let variables: HashSet<&str> = questions
        .iter()
        .map(|q| q.template_variable.as_str())
        .collect();

    let mut unmatched: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|token| !variables.contains(token) && !SYSTEM_TOKENS.contains(token))
        .collect();
    unmatched.sort_unstable();
    issues.extend(unmatched.into_iter().map(|token| CatalogIssue::UnmatchedToken {
        document_type_id: doc_id.clone(),
        token: token.to_string(),
    }));

    let mut seen_ids = HashSet::new();
    for question in questions {
        if !seen_ids.insert(question.id.as_str()) {
            issues.push(CatalogIssue::DuplicateQuestionId {
                document_type_id: doc_id.clone(),
                question_id: question.id.clone(),
            });
        }
        if !tokens.contains(question.template_variable.as_str()) {
            issues.push(CatalogIssue::UnusedVariable {
                document_type_id: doc_id.clone(),
                question_id: question.id.clone(),
                variable: question.template_variable.clone(),
            });
        }
        if !TOKEN_NAME.is_match(&question.template_variable) {
            issues.push(CatalogIssue::NonConventionalVariable {
                document_type_id: doc_id.clone(),
                question_id: question.id.clone(),
                variable: question.template_variable.clone(),
            });
        }
        let has_options = question.options.as_ref().is_some_and(|opts| !opts.is_empty());
        if question.kind.requires_options() && !has_options {
            issues.push(CatalogIssue::MissingOptions {
                document_type_id: doc_id.clone(),
                question_id: question.id.clone(),
            });
        }
    }

    if document_type.question_count != questions.len() {
        issues.push(CatalogIssue::QuestionCountMismatch {
            document_type_id: doc_id.clone(),
            declared: document_type.question_count,
            actual: questions.len(),
        });
    }

    issues
}
