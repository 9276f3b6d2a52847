use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::document::common::normalize_date_answer;

/// Input kind of a question. Every branch on it must stay exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    ShortText,
    LongText,
    Date,
    Number,
    SingleSelect,
}

impl QuestionKind {
    /// Whether questions of this kind must carry a list of options.
    pub fn requires_options(self) -> bool {
        match self {
            QuestionKind::SingleSelect => true,
            QuestionKind::ShortText
            | QuestionKind::LongText
            | QuestionKind::Date
            | QuestionKind::Number => false,
        }
    }

    /// Convert raw user input into the display string that gets stored.
    ///
    /// Dates are formatted to their long form at set time, so generation
    /// never has to know about date parsing.
    pub fn normalize_input(self, raw: &str) -> String {
        match self {
            QuestionKind::Date => normalize_date_answer(raw),
            QuestionKind::ShortText
            | QuestionKind::LongText
            | QuestionKind::Number
            | QuestionKind::SingleSelect => raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    #[schema(example = "18")]
    pub id: String,
    /// Filled in from the owning document type when the catalog is loaded.
    #[serde(default)]
    #[schema(example = "nda")]
    pub document_type_id: String,
    #[schema(example = "What is the name of the first party?")]
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "e.g., ABC Company")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub required: bool,
    #[schema(example = "PARTY_ONE_NAME")]
    pub template_variable: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DocumentType {
    #[schema(example = "nda")]
    pub id: String,
    #[schema(example = "Non-Disclosure Agreement")]
    pub title: String,
    #[schema(example = "A confidentiality agreement to protect sensitive information")]
    pub description: String,
    #[schema(example = "Between [PARTY_ONE_NAME] and [PARTY_TWO_NAME], re: [PURPOSE].")]
    pub template: String,
    pub question_count: usize,
    #[schema(example = "shield")]
    pub icon: String,
}

/// One document type with its questions, as laid out in catalog files.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogEntry {
    #[serde(flatten)]
    pub document_type: DocumentType,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CatalogFile {
    pub document_types: Vec<CatalogEntry>,
}
