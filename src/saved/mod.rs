//! Saved documents - append-only collection of generated documents.
//!
//! New entries go to the front, so listing order is most recent first.
//! When a persistence channel is attached, every save queues a snapshot for
//! the background worker in `persistence`.

pub mod handlers;
pub mod persistence;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::mpsc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::DocumentType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeneratedDocument {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub id: Uuid,
    pub document_type: DocumentType,
    pub created_at: DateTime<Utc>,
    #[schema(example = "NON-DISCLOSURE AGREEMENT\n\nThis Non-Disclosure Agreement is made on June 1, 2024 ...")]
    pub content: String,
}

#[derive(Default)]
pub struct SavedDocuments {
    documents: RwLock<VecDeque<GeneratedDocument>>,
    persist_sender: Option<mpsc::Sender<Vec<GeneratedDocument>>>,
}

impl SavedDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously persisted documents (already newest first) and
    /// forward snapshots of every later save to `sender`.
    pub fn with_persistence(
        restored: Vec<GeneratedDocument>,
        sender: mpsc::Sender<Vec<GeneratedDocument>>,
    ) -> Self {
        Self {
            documents: RwLock::new(restored.into()),
            persist_sender: Some(sender),
        }
    }

    /// Record a new document. Never deduplicates or updates in place.
    pub fn append(&self, document_type: &DocumentType, content: impl Into<String>) -> GeneratedDocument {
        let document = GeneratedDocument {
            id: Uuid::new_v4(),
            document_type: document_type.clone(),
            created_at: Utc::now(),
            content: content.into(),
        };

        let snapshot = {
            let mut documents = self.documents.write();
            documents.push_front(document.clone());
            self.persist_sender
                .as_ref()
                .map(|_| documents.iter().cloned().collect::<Vec<_>>())
        };

        if let (Some(sender), Some(snapshot)) = (&self.persist_sender, snapshot) {
            if let Err(e) = sender.try_send(snapshot) {
                // The in-memory collection stays authoritative until the next save
                log::error!("Failed to queue saved documents for persistence: {}", e);
            } else {
                log::debug!("Saved documents queued for background persistence");
            }
        }

        document
    }

    /// Every saved document, most recent first.
    pub fn list(&self) -> Vec<GeneratedDocument> {
        self.documents.read().iter().cloned().collect()
    }

    pub fn get(&self, id: &Uuid) -> Option<GeneratedDocument> {
        self.documents.read().iter().find(|doc| doc.id == *id).cloned()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}
