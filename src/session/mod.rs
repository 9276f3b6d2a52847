//! Session module - one user's walk through a document type's questions.
//!
//! A `DocumentSession` exclusively owns its answers and page position, so
//! concurrent sessions never share mutable state. Sessions are kept in a
//! `SessionRegistry` with idle expiry.

pub mod answers;
pub mod handlers;
pub mod model;
pub mod pagination;
pub mod registry;

pub use answers::{Answer, AnswerStore};
pub use pagination::{PageStep, Paginator, DEFAULT_PAGE_SIZE};
pub use registry::SessionRegistry;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::{DocumentType, Question};
use crate::document::validation::missing_required;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    /// Paging through questions.
    Answering,
    /// Every required question answered; ready to generate.
    Review,
    /// Backed out of the first page, back to document selection.
    Abandoned,
}

/// Result of asking for the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NextOutcome {
    Advanced { page: usize },
    ReadyForReview,
    /// On the last page with required questions still open (ids, in order).
    Incomplete { missing: Vec<String> },
}

/// Result of asking for the previous page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PreviousOutcome {
    Retreated { page: usize },
    Abandoned,
}

#[derive(Debug, Clone)]
pub struct DocumentSession {
    id: Uuid,
    document_type_id: String,
    answers: AnswerStore,
    paginator: Paginator,
    stage: SessionStage,
}

impl DocumentSession {
    /// Start a session on `document_type` with an empty answer set.
    pub fn start(document_type: &DocumentType, questions: &[Question], page_size: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_type_id: document_type.id.clone(),
            answers: AnswerStore::new(),
            paginator: Paginator::new(questions.len(), page_size),
            stage: SessionStage::Answering,
        }
    }

    /// Switch to another document type. Clears every answer.
    pub fn select_document(&mut self, document_type: &DocumentType, questions: &[Question]) {
        log::debug!(
            "Session {} switching from '{}' to '{}'",
            self.id,
            self.document_type_id,
            document_type.id
        );
        self.answers.clear_answers();
        self.document_type_id = document_type.id.clone();
        self.paginator.reset(questions.len());
        self.stage = SessionStage::Answering;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn document_type_id(&self) -> &str {
        &self.document_type_id
    }

    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// Store input for `question`, normalised for its kind. Returns the stored value.
    pub fn answer(&mut self, question: &Question, raw: &str) -> String {
        let value = question.kind.normalize_input(raw);
        self.answers.set_answer(question.id.clone(), value.clone());
        value
    }

    pub fn set_answer(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.answers.set_answer(question_id, value);
    }

    pub fn get_answer(&self, question_id: &str) -> Option<&str> {
        self.answers.get_answer(question_id)
    }

    pub fn clear_answers(&mut self) {
        self.answers.clear_answers();
    }

    pub fn current_questions<'q>(&self, questions: &'q [Question]) -> &'q [Question] {
        self.paginator.current(questions)
    }

    pub fn missing_required<'q>(&self, questions: &'q [Question]) -> Vec<&'q Question> {
        missing_required(questions, &self.answers)
    }

    /// Advance a page, or on the last page try to move to review.
    ///
    /// Review is reached only when required questions on every page are
    /// answered, not just those on the current one.
    pub fn next(&mut self, questions: &[Question]) -> NextOutcome {
        match self.paginator.next() {
            PageStep::Moved(page) => {
                self.stage = SessionStage::Answering;
                NextOutcome::Advanced { page }
            }
            PageStep::AtBoundary => {
                let missing = self.missing_required(questions);
                if missing.is_empty() {
                    self.stage = SessionStage::Review;
                    NextOutcome::ReadyForReview
                } else {
                    self.stage = SessionStage::Answering;
                    NextOutcome::Incomplete {
                        missing: missing.iter().map(|q| q.id.clone()).collect(),
                    }
                }
            }
        }
    }

    /// Go back a page. From review this returns to the last page of
    /// questions; from the first page it abandons the session.
    pub fn previous(&mut self) -> PreviousOutcome {
        if self.stage == SessionStage::Review {
            self.stage = SessionStage::Answering;
            return PreviousOutcome::Retreated {
                page: self.paginator.current_page(),
            };
        }

        match self.paginator.previous() {
            PageStep::Moved(page) => {
                self.stage = SessionStage::Answering;
                PreviousOutcome::Retreated { page }
            }
            PageStep::AtBoundary => {
                self.stage = SessionStage::Abandoned;
                PreviousOutcome::Abandoned
            }
        }
    }
}
