//! Fire-and-forget user notifications.

use uuid::Uuid;

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyEvent {
    DocumentGenerated { document_type_id: String },
    GenerationFailed { document_type_id: String, reason: String },
    DocumentSaved { document_type_id: String, document_id: Uuid },
    SaveFailed { document_type_id: String, reason: String },
}

/// Delivers notifications. Must not block and must not fail the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: NotifyEvent);
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: NotifyEvent) {
        match event {
            NotifyEvent::DocumentGenerated { document_type_id } => {
                log::info!("Document generated for '{}'", document_type_id);
            }
            NotifyEvent::GenerationFailed {
                document_type_id,
                reason,
            } => {
                log::warn!("Generation failed for '{}': {}", document_type_id, reason);
            }
            NotifyEvent::DocumentSaved {
                document_type_id,
                document_id,
            } => {
                log::info!("Document {} saved for '{}'", document_id, document_type_id);
            }
            NotifyEvent::SaveFailed {
                document_type_id,
                reason,
            } => {
                log::warn!("Save failed for '{}': {}", document_type_id, reason);
            }
        }
    }
}
