use actix_web::{http::header, web, HttpResponse, Responder};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::document::common::export_filename;
use crate::saved::GeneratedDocument;
use crate::{document_error_response, AppState, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SaveDocumentRequest {
    #[schema(example = "nda")]
    pub document_type_id: String,
    pub content: String,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Saved Documents",
    post,
    path = "/saved",
    request_body = SaveDocumentRequest,
    responses(
        (status = 201, description = "Document saved", body = GeneratedDocument),
        (status = 404, description = "Document type not found", body = ErrorResponse)
    )
)]
pub async fn save_document(
    state: web::Data<AppState>,
    item: web::Json<SaveDocumentRequest>,
) -> impl Responder {
    let SaveDocumentRequest {
        document_type_id,
        content,
    } = item.into_inner();

    match state.service.save(&document_type_id, content) {
        Ok(document) => HttpResponse::Created().json(document),
        Err(e) => document_error_response(&e),
    }
}

#[utoipa::path(
    context_path = "/api",
    tag = "Saved Documents",
    get,
    path = "/saved",
    responses(
        (status = 200, description = "Saved documents, most recent first", body = [GeneratedDocument])
    )
)]
pub async fn list_saved(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.service.list_saved())
}

#[utoipa::path(
    context_path = "/api",
    tag = "Saved Documents",
    get,
    path = "/saved/{id}/export",
    params(
        ("id" = Uuid, Path, description = "Saved document id")
    ),
    responses(
        (status = 200, description = "Document content as a text file", body = String, content_type = "text/plain"),
        (status = 404, description = "Saved document not found", body = ErrorResponse)
    )
)]
pub async fn export_saved(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    let Some(document) = state.service.get_saved(&id) else {
        return HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Saved document '{}' not found",
            id
        )));
    };

    let filename = export_filename(&document.document_type.title, document.created_at);
    log::debug!("Exporting saved document {} as {}", id, filename);

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(document.content)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/saved")
            .route(web::get().to(list_saved))
            .route(web::post().to(save_document)),
    )
    .service(web::resource("/saved/{id}/export").route(web::get().to(export_saved)));
}
