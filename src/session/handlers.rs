use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

use crate::catalog::Question;
use crate::document::{DocumentError, GenerationMode};
use crate::session::model::{
    CreateSessionRequest, GenerateQuery, GenerateResponse, NextResponse, PreviousResponse,
    SelectDocumentRequest, SessionView, SetAnswerRequest,
};
use crate::session::registry::SharedSession;
use crate::session::{Answer, DocumentSession};
use crate::{document_error_response, AppState, ErrorResponse};

async fn find_session(state: &web::Data<AppState>, id: &Uuid) -> Result<SharedSession, HttpResponse> {
    state.sessions.get(id).await.ok_or_else(|| {
        log::warn!("Session {} not found or expired", id);
        HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Session '{}' not found",
            id
        )))
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session started on the first page", body = SessionView),
        (status = 404, description = "Document type not found", body = ErrorResponse)
    )
)]
pub async fn create_session(
    state: web::Data<AppState>,
    item: web::Json<CreateSessionRequest>,
) -> impl Responder {
    let Some(document_type) = state.service.get_document_type(&item.document_type_id) else {
        return document_error_response(&DocumentError::not_found(&item.document_type_id));
    };
    let questions = state.service.get_questions(&document_type.id);

    let session = DocumentSession::start(document_type, questions, state.config.page_size);
    let view = SessionView::new(&session, questions);
    state.sessions.insert(session).await;

    HttpResponse::Created().json(view)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    get,
    path = "/sessions/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Current page and answers", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let session = shared.lock();
    let questions = state.service.get_questions(session.document_type_id());
    HttpResponse::Ok().json(SessionView::new(&session, questions))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    delete,
    path = "/sessions/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Session closed and its answers discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn close_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.sessions.remove(&path).await {
        Some(_) => HttpResponse::NoContent().finish(),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Session '{}' not found",
            path
        ))),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    put,
    path = "/sessions/{session_id}/document",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    request_body = SelectDocumentRequest,
    responses(
        (status = 200, description = "Switched document type; all answers cleared", body = SessionView),
        (status = 404, description = "Session or document type not found", body = ErrorResponse)
    )
)]
pub async fn select_document(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    item: web::Json<SelectDocumentRequest>,
) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };
    let Some(document_type) = state.service.get_document_type(&item.document_type_id) else {
        return document_error_response(&DocumentError::not_found(&item.document_type_id));
    };
    let questions = state.service.get_questions(&document_type.id);

    let mut session = shared.lock();
    session.select_document(document_type, questions);
    HttpResponse::Ok().json(SessionView::new(&session, questions))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    put,
    path = "/sessions/{session_id}/answers/{question_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session id"),
        ("question_id" = String, Path, description = "Question id within the session's document type")
    ),
    request_body = SetAnswerRequest,
    responses(
        (status = 200, description = "Answer stored, as it will be substituted", body = Answer),
        (status = 404, description = "Session or question not found", body = ErrorResponse)
    )
)]
pub async fn set_answer(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
    item: web::Json<SetAnswerRequest>,
) -> impl Responder {
    let (session_id, question_id) = path.into_inner();
    let shared = match find_session(&state, &session_id).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let mut session = shared.lock();
    let document_type_id = session.document_type_id().to_string();
    let Some(question) = state
        .service
        .catalog()
        .find_question(&document_type_id, &question_id)
    else {
        return document_error_response(&DocumentError::UnknownQuestion {
            document_type_id,
            question_id,
        });
    };

    let value = session.answer(question, &item.value);
    log::debug!("Session {} answered question {}", session_id, question_id);

    HttpResponse::Ok().json(Answer { question_id, value })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    get,
    path = "/sessions/{session_id}/answers/{question_id}",
    params(
        ("session_id" = Uuid, Path, description = "Session id"),
        ("question_id" = String, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Current answer", body = Answer),
        (status = 404, description = "Session not found or question unanswered", body = ErrorResponse)
    )
)]
pub async fn get_answer(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> impl Responder {
    let (session_id, question_id) = path.into_inner();
    let shared = match find_session(&state, &session_id).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let session = shared.lock();
    match session.get_answer(&question_id) {
        Some(value) => HttpResponse::Ok().json(Answer {
            question_id,
            value: value.to_string(),
        }),
        None => HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Question '{}' has no answer",
            question_id
        ))),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    delete,
    path = "/sessions/{session_id}/answers",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 204, description = "Every answer removed"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn clear_answers(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    shared.lock().clear_answers();
    HttpResponse::NoContent().finish()
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{session_id}/next",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Moved forward, entered review, or blocked by missing answers", body = NextResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn next_page(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let mut session = shared.lock();
    let questions = state.service.get_questions(session.document_type_id());
    let result = session.next(questions);
    HttpResponse::Ok().json(NextResponse {
        result,
        session: SessionView::new(&session, questions),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{session_id}/previous",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Moved back, or abandoned from the first page", body = PreviousResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn previous_page(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let mut session = shared.lock();
    let questions = state.service.get_questions(session.document_type_id());
    let result = session.previous();
    HttpResponse::Ok().json(PreviousResponse {
        result,
        session: SessionView::new(&session, questions),
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    get,
    path = "/sessions/{session_id}/missing",
    params(
        ("session_id" = Uuid, Path, description = "Session id")
    ),
    responses(
        (status = 200, description = "Unanswered required questions, in question order", body = [Question]),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn missing_required(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    let session = shared.lock();
    let missing: Vec<Question> = state
        .service
        .missing_required(session.document_type_id(), session.answers())
        .into_iter()
        .cloned()
        .collect();
    HttpResponse::Ok().json(missing)
}

#[utoipa::path(
    context_path = "/api",
    tag = "Sessions",
    post,
    path = "/sessions/{session_id}/generate",
    params(
        ("session_id" = Uuid, Path, description = "Session id"),
        GenerateQuery
    ),
    responses(
        (status = 200, description = "Rendered document text", body = GenerateResponse),
        (status = 404, description = "Session or document type not found", body = ErrorResponse),
        (status = 422, description = "Strict mode with required questions unanswered", body = ErrorResponse)
    )
)]
pub async fn generate(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<GenerateQuery>,
) -> impl Responder {
    let shared = match find_session(&state, &path).await {
        Ok(shared) => shared,
        Err(response) => return response,
    };

    // Snapshot so the lock is released before the generation delay
    let (document_type_id, answers) = {
        let session = shared.lock();
        (session.document_type_id().to_string(), session.answers().clone())
    };
    let mode = GenerationMode::from_strict_flag(query.strict.unwrap_or(false));

    match state.service.generate(&document_type_id, &answers, mode).await {
        Ok(content) => HttpResponse::Ok().json(GenerateResponse {
            document_type_id,
            content,
        }),
        Err(e) => document_error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/sessions/{session_id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(close_session)),
        )
        .service(
            web::resource("/sessions/{session_id}/document")
                .route(web::put().to(select_document)),
        )
        .service(
            web::resource("/sessions/{session_id}/answers")
                .route(web::delete().to(clear_answers)),
        )
        .service(
            web::resource("/sessions/{session_id}/answers/{question_id}")
                .route(web::get().to(get_answer))
                .route(web::put().to(set_answer)),
        )
        .service(web::resource("/sessions/{session_id}/next").route(web::post().to(next_page)))
        .service(
            web::resource("/sessions/{session_id}/previous").route(web::post().to(previous_page)),
        )
        .service(
            web::resource("/sessions/{session_id}/missing")
                .route(web::get().to(missing_required)),
        )
        .service(
            web::resource("/sessions/{session_id}/generate").route(web::post().to(generate)),
        );
}
