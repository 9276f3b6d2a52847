use actix_web::{http::header, http::StatusCode, test, web, App};
use legal_docgen_server::catalog::Catalog;
use legal_docgen_server::{configure_api, AppConfig, AppState};
use serde_json::{json, Value};

fn test_state() -> web::Data<AppState> {
    let catalog = Catalog::builtin().expect("bundled catalog should load");
    web::Data::new(AppState::in_memory(catalog, AppConfig::default()))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(configure_api)),
        )
        .await
    };
}

macro_rules! create_session {
    ($app:expr, $document_type_id:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/sessions")
            .set_json(json!({ "document_type_id": $document_type_id }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        body
    }};
}

#[actix_web::test]
async fn test_list_document_types() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/documents").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.len(), 10);
    assert_eq!(body[0]["id"], "rental-agreement");
    assert_eq!(body[0]["question_count"], 8);
}

#[actix_web::test]
async fn test_get_document_type_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/documents/lease").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_questions_for_unknown_type_are_empty() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/documents/lease/questions")
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/documents/nda/questions")
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body.iter().map(|q| q["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["18", "19", "20", "21", "22", "23"]);
}

#[actix_web::test]
async fn test_create_session_shows_first_page() {
    let state = test_state();
    let app = init_app!(state);

    let session = create_session!(app, "rental-agreement");
    assert_eq!(session["stage"], "answering");
    assert_eq!(session["current_page"], 1);
    assert_eq!(session["total_pages"], 3);
    assert_eq!(session["questions"].as_array().unwrap().len(), 3);
    assert_eq!(session["answers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_create_session_unknown_type() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "document_type_id": "lease" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{ nope")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
}

#[actix_web::test]
async fn test_unknown_session_is_not_found() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/sessions/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_answer_round_trip_and_date_formatting() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "rental-agreement");
    let sid = session["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/answers/4", sid))
        .set_json(json!({ "value": "2024-06-01" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "question_id": "4", "value": "June 1, 2024" }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/answers/4", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["value"], "June 1, 2024");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/sessions/{}/answers", sid))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/answers/4", sid))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_answer_for_foreign_question_is_rejected() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "nda");
    let sid = session["id"].as_str().unwrap();

    // Question 1 belongs to the rental agreement
    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/answers/1", sid))
        .set_json(json!({ "value": "Jane" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["answers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_full_nda_flow() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "nda");
    let sid = session["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/next", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"], json!({ "outcome": "advanced", "page": 2 }));
    assert_eq!(body["session"]["is_last_page"], true);

    // Last page with everything unanswered
    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/next", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"]["outcome"], "incomplete");
    assert_eq!(body["result"]["missing"].as_array().unwrap().len(), 6);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/generate?strict=true", sid))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ValidationIncomplete");
    assert_eq!(body["details"].as_array().unwrap().len(), 6);

    let answers = [
        ("18", "Acme Corp"),
        ("19", "Globex LLC"),
        ("20", "evaluating a merger"),
        ("21", "financial statements"),
        ("22", "2 years"),
        ("23", "Delaware"),
    ];
    for (question_id, value) in answers {
        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/answers/{}", sid, question_id))
            .set_json(json!({ "value": value }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}/missing", sid))
        .to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(body.is_empty());

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/next", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"]["outcome"], "ready_for_review");
    assert_eq!(body["session"]["stage"], "review");

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/generate?strict=true", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let content = body["content"].as_str().unwrap().to_string();
    assert!(content.contains("Acme Corp"));
    assert!(content.contains("Delaware"));
    assert!(!content.contains("[DATE]"));
    assert!(!content.contains("REQUIRED]"));

    let req = test::TestRequest::post()
        .uri("/api/saved")
        .set_json(json!({ "document_type_id": "nda", "content": content }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let saved: Value = test::read_body_json(resp).await;
    assert_eq!(saved["document_type"]["id"], "nda");

    let req = test::TestRequest::get()
        .uri(&format!("/api/saved/{}/export", saved["id"].as_str().unwrap()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"non-disclosure-agreement-"));
    assert!(disposition.ends_with(".txt\""));
    let exported = test::read_body(resp).await;
    assert_eq!(exported, content.as_bytes());
}

#[actix_web::test]
async fn test_lenient_generate_marks_missing_answers() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "nda");
    let sid = session["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/answers/18", sid))
        .set_json(json!({ "value": "Acme" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/generate", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let content = body["content"].as_str().unwrap();
    assert!(content.contains("Acme"));
    assert!(content.contains("[PARTY_TWO_NAME - REQUIRED]"));
}

#[actix_web::test]
async fn test_previous_from_first_page_abandons() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "will");
    let sid = session["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/previous", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["result"]["outcome"], "abandoned");
    assert_eq!(body["session"]["stage"], "abandoned");
}

#[actix_web::test]
async fn test_select_document_clears_answers() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "nda");
    let sid = session["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/answers/18", sid))
        .set_json(json!({ "value": "Acme" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/sessions/{}/document", sid))
        .set_json(json!({ "document_type_id": "invoice" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["document_type_id"], "invoice");
    assert_eq!(body["total_pages"], 6);
    assert_eq!(body["answers"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_save_unknown_type_leaves_history_unchanged() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/saved")
        .set_json(json!({ "document_type_id": "will", "content": "first" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/saved")
        .set_json(json!({ "document_type_id": "lease", "content": "second" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/saved")
        .set_json(json!({ "document_type_id": "invoice", "content": "third" }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/saved").to_request();
    let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    let contents: Vec<&str> = body.iter().map(|d| d["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["third", "first"]);
}

#[actix_web::test]
async fn test_export_unknown_document() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/saved/00000000-0000-0000-0000-000000000000/export")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_close_session() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "will");
    let uri = format!("/api/sessions/{}", session["id"].as_str().unwrap());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
}

#[actix_web::test]
async fn test_session_answers_follow_question_order() {
    let state = test_state();
    let app = init_app!(state);
    let session = create_session!(app, "rental-agreement");
    let sid = session["id"].as_str().unwrap();

    for (question_id, value) in [("9", "Water"), ("3", "Bob"), ("1", "Alice")] {
        let req = test::TestRequest::put()
            .uri(&format!("/api/sessions/{}/answers/{}", sid, question_id))
            .set_json(json!({ "value": value }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/sessions/{}", sid))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body["answers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|answer| answer["question_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "3", "9"]);
}
