use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpResponse, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod catalog;
pub mod config;
pub mod document;
pub mod notify;
pub mod saved;
pub mod service;
pub mod session;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

use crate::document::DocumentError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Offending ids, e.g. the unanswered required questions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn validation_incomplete(message: &str, missing: Vec<String>) -> Self {
        Self::new("ValidationIncomplete", message).with_details(missing)
    }
}

/// Map a document error onto its HTTP response.
pub fn document_error_response(error: &DocumentError) -> HttpResponse {
    match error {
        DocumentError::NotFound { .. } | DocumentError::UnknownQuestion { .. } => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&error.to_string()))
        }
        DocumentError::ValidationIncomplete { missing, message } => {
            HttpResponse::UnprocessableEntity()
                .json(ErrorResponse::validation_incomplete(message, missing.clone()))
        }
    }
}

/// Malformed JSON bodies get the same error envelope as everything else.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message)),
        )
        .into()
    })
}

/// Every `/api` route. Shared by the server and the HTTP tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(catalog::handlers::config)
        .configure(session::handlers::config)
        .configure(saved::handlers::config);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::catalog::handlers::list_document_types,
        crate::catalog::handlers::get_document_type,
        crate::catalog::handlers::get_questions,
        crate::session::handlers::create_session,
        crate::session::handlers::get_session,
        crate::session::handlers::close_session,
        crate::session::handlers::select_document,
        crate::session::handlers::set_answer,
        crate::session::handlers::get_answer,
        crate::session::handlers::clear_answers,
        crate::session::handlers::next_page,
        crate::session::handlers::previous_page,
        crate::session::handlers::missing_required,
        crate::session::handlers::generate,
        crate::saved::handlers::save_document,
        crate::saved::handlers::list_saved,
        crate::saved::handlers::export_saved
    ),
    components(
        schemas(
            catalog::DocumentType,
            catalog::Question,
            catalog::QuestionKind,
            session::Answer,
            session::SessionStage,
            session::NextOutcome,
            session::PreviousOutcome,
            session::model::CreateSessionRequest,
            session::model::SelectDocumentRequest,
            session::model::SetAnswerRequest,
            session::model::SessionView,
            session::model::NextResponse,
            session::model::PreviousResponse,
            session::model::GenerateResponse,
            saved::GeneratedDocument,
            saved::handlers::SaveDocumentRequest,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Catalog", description = "Document types and their questions."),
        (name = "Sessions", description = "Answering questions page by page and generating documents."),
        (name = "Saved Documents", description = "Saved document history and export.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost server")
    )
)]
pub struct ApiDoc;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // Load .env file
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let app_state = match AppState::new(config.clone()).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            log::error!("Failed to initialise application state: {}", e);
            std::process::exit(1);
        }
    };

    let prometheus = PrometheusMetricsBuilder::new("legal_docgen_server")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create Prometheus metrics middleware: {}", e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .expose_headers(vec![header::CONTENT_DISPOSITION])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(configure_api))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
