//! Shared application state handed to every handler.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::AppConfig;
use crate::saved::persistence::{self, DocumentStorage, LocalFileStorage, StorageError};
use crate::saved::SavedDocuments;
use crate::service::DocumentService;
use crate::session::SessionRegistry;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("failed to restore saved documents: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct AppState {
    pub service: DocumentService,
    pub sessions: SessionRegistry,
    pub config: AppConfig,
}

impl AppState {
    /// Load the catalog, restore saved documents when a storage directory is
    /// configured, and spawn the persistence worker.
    pub async fn new(config: AppConfig) -> Result<Self, StartupError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                log::info!("Loading catalog from {}", path.display());
                Catalog::from_path(path)?
            }
            None => Catalog::builtin()?,
        };
        log::info!("Catalog loaded with {} document types", catalog.len());

        let storage: Option<Arc<dyn DocumentStorage + Send + Sync>> = config
            .saved_documents_path
            .as_ref()
            .map(|dir| Arc::new(LocalFileStorage::new(dir)) as Arc<dyn DocumentStorage + Send + Sync>);

        match storage {
            Some(storage) => Self::with_storage(catalog, config, storage).await,
            None => {
                log::warn!("SAVED_DOCUMENTS_PATH not set, saved documents are kept in memory only");
                Ok(Self::in_memory(catalog, config))
            }
        }
    }

    /// State whose saved collection is restored from and persisted to `storage`.
    pub async fn with_storage(
        catalog: Catalog,
        config: AppConfig,
        storage: Arc<dyn DocumentStorage + Send + Sync>,
    ) -> Result<Self, StartupError> {
        let restored = persistence::load_snapshot(storage.as_ref()).await?;
        log::info!("Restored {} saved documents", restored.len());

        // Create channel for saved documents persistence worker
        let (persist_sender, receiver) = mpsc::channel(100);
        tokio::spawn(async move {
            persistence::start_persistence_worker(receiver, storage).await;
        });

        let saved = SavedDocuments::with_persistence(restored, persist_sender);
        Ok(Self::assemble(catalog, config, saved))
    }

    /// State with nothing persisted.
    pub fn in_memory(catalog: Catalog, config: AppConfig) -> Self {
        Self::assemble(catalog, config, SavedDocuments::new())
    }

    fn assemble(catalog: Catalog, config: AppConfig, saved: SavedDocuments) -> Self {
        for issue in catalog.lint() {
            log::warn!("Catalog: {}", issue);
        }

        let service = DocumentService::new(Arc::new(catalog), Arc::new(saved))
            .with_generation_delay(config.generation_delay);
        let sessions = SessionRegistry::new(config.session_ttl, config.max_sessions);

        Self {
            service,
            sessions,
            config,
        }
    }
}
