//! Catalog module - static registry of document types and their questions.
//!
//! The catalog is built once at startup, either from the bundled
//! `static/catalog.json` or from a file named by `CATALOG_PATH`, and is
//! shared read-only afterwards.

pub mod handlers;
pub mod lint;
pub mod model;

pub use lint::CatalogIssue;
pub use model::{DocumentType, Question, QuestionKind};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use model::CatalogFile;

const BUILTIN_CATALOG: &str = include_str!("../../static/catalog.json");

/// Errors that can occur while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[source] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("document type '{0}' is defined more than once")]
    DuplicateDocumentType(String),
}

/// Read-only registry of document types and their ordered question lists.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    document_types: Vec<DocumentType>,
    questions: HashMap<String, Vec<Question>>,
}

impl Catalog {
    /// Build a catalog from document types paired with their questions.
    ///
    /// Each question's `document_type_id` is overwritten with the id of the
    /// document type it is listed under.
    pub fn new(
        entries: impl IntoIterator<Item = (DocumentType, Vec<Question>)>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::default();

        for (document_type, mut questions) in entries {
            if catalog.questions.contains_key(&document_type.id) {
                return Err(CatalogError::DuplicateDocumentType(document_type.id));
            }
            for question in &mut questions {
                question.document_type_id = document_type.id.clone();
            }
            catalog
                .questions
                .insert(document_type.id.clone(), questions);
            catalog.document_types.push(document_type);
        }

        Ok(catalog)
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::new(
            file.document_types
                .into_iter()
                .map(|entry| (entry.document_type, entry.questions)),
        )
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(CatalogError::Io)?;
        Self::from_json(&json)
    }

    /// All document types in definition order.
    pub fn list_document_types(&self) -> &[DocumentType] {
        &self.document_types
    }

    pub fn get_document_type(&self, id: &str) -> Option<&DocumentType> {
        self.document_types.iter().find(|doc| doc.id == id)
    }

    /// Ordered questions of a document type. Unknown ids yield an empty slice.
    pub fn get_questions(&self, document_type_id: &str) -> &[Question] {
        self.questions
            .get(document_type_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn find_question(&self, document_type_id: &str, question_id: &str) -> Option<&Question> {
        self.get_questions(document_type_id)
            .iter()
            .find(|question| question.id == question_id)
    }

    pub fn len(&self) -> usize {
        self.document_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document_types.is_empty()
    }

    /// Check the catalog for configuration defects.
    pub fn lint(&self) -> Vec<CatalogIssue> {
        self.document_types
            .iter()
            .flat_map(|doc| lint::lint_document_type(doc, self.get_questions(&doc.id)))
            .collect()
    }
}
