//! `DocumentService` - the engine's public operations over the shared
//! catalog and saved collection.
//!
//! Answer sets are session-owned and passed in by reference; the service
//! itself holds no per-user state.

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::catalog::{Catalog, DocumentType, Question};
use crate::document::common::today;
use crate::document::{
    missing_required, DocumentError, GenerationMode, TemplateRenderEngine, ValidationErrors,
};
use crate::notify::{LogNotifier, Notifier, NotifyEvent};
use crate::saved::{GeneratedDocument, SavedDocuments};
use crate::session::AnswerStore;

#[derive(Clone)]
pub struct DocumentService {
    catalog: Arc<Catalog>,
    saved: Arc<SavedDocuments>,
    notifier: Arc<dyn Notifier>,
    generation_delay: Duration,
}

impl DocumentService {
    pub fn new(catalog: Arc<Catalog>, saved: Arc<SavedDocuments>) -> Self {
        Self {
            catalog,
            saved,
            notifier: Arc::new(LogNotifier),
            generation_delay: Duration::ZERO,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Wait applied before `generate` returns. Purely cosmetic.
    pub fn with_generation_delay(mut self, delay: Duration) -> Self {
        self.generation_delay = delay;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_document_types(&self) -> &[DocumentType] {
        self.catalog.list_document_types()
    }

    pub fn get_document_type(&self, id: &str) -> Option<&DocumentType> {
        self.catalog.get_document_type(id)
    }

    pub fn get_questions(&self, document_type_id: &str) -> &[Question] {
        self.catalog.get_questions(document_type_id)
    }

    /// Required questions of `document_type_id` still unanswered in `answers`.
    /// Unknown ids have no questions, so nothing is missing.
    pub fn missing_required(&self, document_type_id: &str, answers: &AnswerStore) -> Vec<&Question> {
        missing_required(self.catalog.get_questions(document_type_id), answers)
    }

    /// Render a document synchronously with a caller-fixed `now`.
    pub fn render_document(
        &self,
        document_type_id: &str,
        answers: &AnswerStore,
        mode: GenerationMode,
        now: NaiveDate,
    ) -> Result<String, DocumentError> {
        let document_type = self
            .catalog
            .get_document_type(document_type_id)
            .ok_or_else(|| DocumentError::not_found(document_type_id))?;
        let questions = self.catalog.get_questions(document_type_id);

        if mode == GenerationMode::Strict {
            let missing = missing_required(questions, answers);
            if !missing.is_empty() {
                return Err(DocumentError::incomplete(&ValidationErrors::from_missing(
                    &missing,
                )));
            }
        }

        Ok(TemplateRenderEngine::render(
            document_type,
            questions,
            answers,
            now,
        ))
    }

    /// Generate the document for `document_type_id` dated today.
    pub async fn generate(
        &self,
        document_type_id: &str,
        answers: &AnswerStore,
        mode: GenerationMode,
    ) -> Result<String, DocumentError> {
        if !self.generation_delay.is_zero() {
            tokio::time::sleep(self.generation_delay).await;
        }

        let result = self.render_document(document_type_id, answers, mode, today());
        match &result {
            Ok(content) => {
                log::debug!(
                    "Rendered '{}' ({} bytes, {:?} mode)",
                    document_type_id,
                    content.len(),
                    mode
                );
                self.notifier.notify(NotifyEvent::DocumentGenerated {
                    document_type_id: document_type_id.to_string(),
                });
            }
            Err(e) => self.notifier.notify(NotifyEvent::GenerationFailed {
                document_type_id: document_type_id.to_string(),
                reason: e.to_string(),
            }),
        }
        result
    }

    /// Append generated content to the saved collection.
    pub fn save(
        &self,
        document_type_id: &str,
        content: impl Into<String>,
    ) -> Result<GeneratedDocument, DocumentError> {
        let Some(document_type) = self.catalog.get_document_type(document_type_id) else {
            let error = DocumentError::not_found(document_type_id);
            self.notifier.notify(NotifyEvent::SaveFailed {
                document_type_id: document_type_id.to_string(),
                reason: error.to_string(),
            });
            return Err(error);
        };

        let document = self.saved.append(document_type, content);
        self.notifier.notify(NotifyEvent::DocumentSaved {
            document_type_id: document_type_id.to_string(),
            document_id: document.id,
        });
        Ok(document)
    }

    /// Saved documents, most recent first.
    pub fn list_saved(&self) -> Vec<GeneratedDocument> {
        self.saved.list()
    }

    pub fn get_saved(&self, id: &Uuid) -> Option<GeneratedDocument> {
        self.saved.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        events: Mutex<Vec<NotifyEvent>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, event: NotifyEvent) {
            self.events.lock().push(event);
        }
    }

    fn service() -> (DocumentService, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let service = DocumentService::new(
            Arc::new(Catalog::builtin().unwrap()),
            Arc::new(SavedDocuments::new()),
        )
        .with_notifier(notifier.clone());
        (service, notifier)
    }

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_render_unknown_document_type() {
        let (service, _) = service();
        let result = service.render_document(
            "lease",
            &AnswerStore::new(),
            GenerationMode::Lenient,
            june_first(),
        );
        assert_eq!(result, Err(DocumentError::not_found("lease")));
    }

    #[test]
    fn test_strict_mode_reports_missing_questions() {
        let (service, _) = service();
        let mut answers = AnswerStore::new();
        answers.set_answer("18", "Acme");

        let result =
            service.render_document("nda", &answers, GenerationMode::Strict, june_first());
        match result {
            Err(DocumentError::ValidationIncomplete { missing, message }) => {
                assert_eq!(missing, vec!["19", "20", "21", "22", "23"]);
                assert!(message.starts_with("Validation failed: 5 required question(s) unanswered"));
                assert!(message.contains("[19] "));
            }
            other => panic!("expected ValidationIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_lenient_mode_renders_sentinels() {
        let (service, _) = service();
        let content = service
            .render_document("nda", &AnswerStore::new(), GenerationMode::Lenient, june_first())
            .unwrap();
        assert!(content.contains("[PARTY_ONE_NAME - REQUIRED]"));
        assert!(content.contains("June 1, 2024"));
    }

    #[tokio::test]
    async fn test_generate_notifies() {
        let (service, notifier) = service();
        service
            .generate("nda", &AnswerStore::new(), GenerationMode::Lenient)
            .await
            .unwrap();
        assert!(service
            .generate("lease", &AnswerStore::new(), GenerationMode::Lenient)
            .await
            .is_err());

        let events = notifier.events.lock();
        assert_eq!(
            events[0],
            NotifyEvent::DocumentGenerated {
                document_type_id: "nda".to_string()
            }
        );
        assert!(matches!(&events[1], NotifyEvent::GenerationFailed { document_type_id, .. } if document_type_id == "lease"));
    }

    #[test]
    fn test_failed_save_leaves_collection_unchanged() {
        let (service, notifier) = service();
        service.save("nda", "first").unwrap();

        assert!(service.save("lease", "content").is_err());
        assert_eq!(service.list_saved().len(), 1);
        assert!(matches!(
            notifier.events.lock().last(),
            Some(NotifyEvent::SaveFailed { .. })
        ));
    }

    #[test]
    fn test_save_prepends() {
        let (service, _) = service();
        service.save("nda", "first").unwrap();
        let second = service.save("will", "second").unwrap();

        let saved = service.list_saved();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, second.id);
        assert_eq!(saved[0].document_type.id, "will");
        assert_eq!(service.get_saved(&second.id), Some(second));
    }

    #[test]
    fn test_missing_required_for_unknown_type_is_empty() {
        let (service, _) = service();
        assert!(service.missing_required("lease", &AnswerStore::new()).is_empty());
    }
}
