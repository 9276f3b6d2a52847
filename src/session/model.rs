use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{Answer, DocumentSession, NextOutcome, PreviousOutcome, SessionStage};
use crate::catalog::Question;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    #[schema(example = "rental-agreement")]
    pub document_type_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectDocumentRequest {
    #[schema(example = "nda")]
    pub document_type_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAnswerRequest {
    /// Raw input. ISO dates (`2024-06-01`) are stored in long form for date questions.
    #[schema(example = "Acme Corporation")]
    pub value: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GenerateQuery {
    /// Refuse to generate while required questions are unanswered.
    pub strict: Option<bool>,
}

/// Snapshot of a session with the questions of its current page.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub document_type_id: String,
    pub stage: SessionStage,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub is_first_page: bool,
    pub is_last_page: bool,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
}

impl SessionView {
    pub fn new(session: &DocumentSession, questions: &[Question]) -> Self {
        let paginator = session.paginator();
        Self {
            id: session.id(),
            document_type_id: session.document_type_id().to_string(),
            stage: session.stage(),
            current_page: paginator.current_page(),
            total_pages: paginator.total_pages(),
            page_size: paginator.page_size(),
            is_first_page: paginator.is_first_page(),
            is_last_page: paginator.is_last_page(),
            questions: session.current_questions(questions).to_vec(),
            answers: session.answers().ordered(questions),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NextResponse {
    pub result: NextOutcome,
    pub session: SessionView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviousResponse {
    pub result: PreviousOutcome,
    pub session: SessionView,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenerateResponse {
    pub document_type_id: String,
    pub content: String,
}
