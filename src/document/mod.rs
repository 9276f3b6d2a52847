//! Document module - validation and text generation from catalog templates.
//!
//! - `template` - single-pass `[TOKEN]` scanner
//! - `engine` - renders a template against an answer set
//! - `validation` - required-answer gate shared by review and strict generation
//! - `common` - date formatting and export naming

pub mod common;
pub mod engine;
pub mod template;
pub mod validation;

pub use engine::{TemplateRenderEngine, DATE_TOKEN};
pub use validation::{missing_required, ValidationError, ValidationErrors};

use thiserror::Error;

/// Errors surfaced by document operations.
///
/// None of them are fatal and none leave stored state modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("Document type '{document_type_id}' not found")]
    NotFound { document_type_id: String },
    #[error("{message}")]
    ValidationIncomplete {
        /// Ids of the unanswered required questions, in question order
        missing: Vec<String>,
        message: String,
    },
    #[error("Question '{question_id}' does not belong to document type '{document_type_id}'")]
    UnknownQuestion {
        document_type_id: String,
        question_id: String,
    },
}

impl DocumentError {
    pub fn not_found(document_type_id: impl Into<String>) -> Self {
        Self::NotFound {
            document_type_id: document_type_id.into(),
        }
    }

    pub fn incomplete(errors: &ValidationErrors) -> Self {
        Self::ValidationIncomplete {
            missing: errors.fields(),
            message: errors.to_message(),
        }
    }
}

/// How generation treats unanswered required questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Render anyway, marking gaps with `[VAR - REQUIRED]`.
    #[default]
    Lenient,
    /// Refuse to render while anything required is missing.
    Strict,
}

impl GenerationMode {
    pub fn from_strict_flag(strict: bool) -> Self {
        if strict {
            GenerationMode::Strict
        } else {
            GenerationMode::Lenient
        }
    }
}
