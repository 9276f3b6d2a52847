use actix_web::{web, HttpResponse, Responder};

use crate::catalog::{DocumentType, Question};
use crate::{AppState, ErrorResponse};

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog",
    get,
    path = "/documents",
    responses(
        (status = 200, description = "Every document type, in catalog order", body = [DocumentType])
    )
)]
pub async fn list_document_types(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.service.list_document_types())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog",
    get,
    path = "/documents/{id}",
    params(
        ("id" = String, Path, description = "Document type id, e.g. `nda`")
    ),
    responses(
        (status = 200, description = "Document type found", body = DocumentType),
        (status = 404, description = "Document type not found", body = ErrorResponse)
    )
)]
pub async fn get_document_type(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let id = path.into_inner();
    match state.service.get_document_type(&id) {
        Some(document_type) => HttpResponse::Ok().json(document_type),
        None => {
            log::warn!("Document type '{}' requested but not in catalog", id);
            HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                "Document type '{}' not found",
                id
            )))
        }
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Catalog",
    get,
    path = "/documents/{id}/questions",
    params(
        ("id" = String, Path, description = "Document type id")
    ),
    responses(
        (status = 200, description = "Ordered questions; empty for an unknown id", body = [Question])
    )
)]
pub async fn get_questions(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    HttpResponse::Ok().json(state.service.get_questions(&path.into_inner()))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/documents").route(web::get().to(list_document_types)))
        .service(web::resource("/documents/{id}").route(web::get().to(get_document_type)))
        .service(
            web::resource("/documents/{id}/questions").route(web::get().to(get_questions)),
        );
}
