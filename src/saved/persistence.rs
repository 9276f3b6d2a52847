//! Background persistence worker for saved documents.
//!
//! Snapshots of the saved collection arrive over a channel and are written
//! through a `DocumentStorage` backend, debounced so bursts of saves produce
//! one write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};

use super::GeneratedDocument;

pub const SAVED_DOCUMENTS_FILE: &str = "saved_documents.json";
const DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to (de)serialize saved documents: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Where snapshots of the saved collection are kept.
#[async_trait]
pub trait DocumentStorage {
    async fn write_file(&self, filename: &str, data: &[u8]) -> Result<(), StorageError>;

    /// `Ok(None)` when the file does not exist yet.
    async fn read_file(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError>;
}

/// Stores files under a local directory.
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentStorage for LocalFileStorage {
    async fn write_file(&self, filename: &str, data: &[u8]) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root).await?;
        // Write-then-rename so a crash never leaves a truncated snapshot
        let target = self.root.join(filename);
        let staging = self.root.join(format!("{filename}.tmp"));
        tokio::fs::write(&staging, data).await?;
        tokio::fs::rename(&staging, &target).await?;
        Ok(())
    }

    async fn read_file(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match tokio::fs::read(self.root.join(filename)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps files in memory. Used when no storage directory is configured and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn has_file(&self, filename: &str) -> bool {
        self.files.lock().await.contains_key(filename)
    }
}

#[async_trait]
impl DocumentStorage for MemoryStorage {
    async fn write_file(&self, filename: &str, data: &[u8]) -> Result<(), StorageError> {
        self.files
            .lock()
            .await
            .insert(filename.to_string(), data.to_vec());
        Ok(())
    }

    async fn read_file(&self, filename: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.files.lock().await.get(filename).cloned())
    }
}

/// Load the last persisted snapshot, newest first. Empty when none exists.
pub async fn load_snapshot(
    storage: &(dyn DocumentStorage + Send + Sync),
) -> Result<Vec<GeneratedDocument>, StorageError> {
    match storage.read_file(SAVED_DOCUMENTS_FILE).await? {
        Some(data) => Ok(serde_json::from_slice(&data)?),
        None => Ok(Vec::new()),
    }
}

/// Replace `latest` with any snapshots already queued. Returns how many were
/// superseded.
fn take_queued(
    receiver: &mut mpsc::Receiver<Vec<GeneratedDocument>>,
    latest: &mut Vec<GeneratedDocument>,
) -> usize {
    let mut superseded = 0;
    while let Ok(newer) = receiver.try_recv() {
        *latest = newer;
        superseded += 1;
    }
    superseded
}

/// Wait out the debounce window and return the newest snapshot seen.
async fn settle(
    receiver: &mut mpsc::Receiver<Vec<GeneratedDocument>>,
    first: Vec<GeneratedDocument>,
) -> Vec<GeneratedDocument> {
    let mut latest = first;
    let mut superseded = take_queued(receiver, &mut latest);
    tokio::time::sleep(tokio::time::Duration::from_millis(DEBOUNCE_MS)).await;
    superseded += take_queued(receiver, &mut latest);

    if superseded > 0 {
        log::debug!("Collapsed {} saved documents snapshot(s) into one write", superseded);
    }
    latest
}

async fn persist_snapshot(
    storage: &(dyn DocumentStorage + Send + Sync),
    documents: &[GeneratedDocument],
) -> Result<(), StorageError> {
    let data = serde_json::to_vec(documents)?;
    storage.write_file(SAVED_DOCUMENTS_FILE, &data).await
}

/// Write snapshots of the saved collection until every sender is dropped.
///
/// A failed write is logged and the worker keeps running; the next save
/// queues a fresh full snapshot.
pub async fn start_persistence_worker(
    mut receiver: mpsc::Receiver<Vec<GeneratedDocument>>,
    storage: Arc<dyn DocumentStorage + Send + Sync>,
) {
    log::info!("Saved documents persistence worker started");

    while let Some(first) = receiver.recv().await {
        let documents = settle(&mut receiver, first).await;
        match persist_snapshot(storage.as_ref(), &documents).await {
            Ok(()) => log::info!("Saved documents persisted ({} documents)", documents.len()),
            Err(e) => log::error!("Failed to persist saved documents: {}", e),
        }
    }

    log::info!("Saved documents persistence worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::saved::SavedDocuments;

    fn nda() -> crate::catalog::DocumentType {
        Catalog::builtin()
            .unwrap()
            .get_document_type("nda")
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn test_load_snapshot_without_file_is_empty() {
        let storage = MemoryStorage::new();
        assert!(load_snapshot(&storage).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_worker_writes_latest_snapshot() {
        let storage = Arc::new(MemoryStorage::new());
        let (sender, receiver) = mpsc::channel(16);
        let worker = tokio::spawn(start_persistence_worker(receiver, storage.clone()));

        let saved = SavedDocuments::with_persistence(Vec::new(), sender);
        saved.append(&nda(), "first");
        saved.append(&nda(), "second");
        drop(saved);

        worker.await.unwrap();

        assert!(storage.has_file(SAVED_DOCUMENTS_FILE).await);
        let restored = load_snapshot(storage.as_ref()).await.unwrap();
        let contents: Vec<String> = restored.into_iter().map(|d| d.content).collect();
        assert_eq!(contents, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_settle_keeps_newest_snapshot() {
        let saved = SavedDocuments::new();
        let first = vec![saved.append(&nda(), "first")];
        let second = vec![saved.append(&nda(), "second"), first[0].clone()];

        let (sender, mut receiver) = mpsc::channel(16);
        sender.send(first).await.unwrap();
        sender.send(second.clone()).await.unwrap();

        let queued = receiver.recv().await.unwrap();
        assert_eq!(settle(&mut receiver, queued).await, second);
    }

    #[tokio::test]
    async fn test_settle_picks_up_snapshot_sent_during_debounce() {
        let saved = SavedDocuments::new();
        let first = vec![saved.append(&nda(), "first")];
        let late = vec![saved.append(&nda(), "late"), first[0].clone()];

        let (sender, mut receiver) = mpsc::channel(16);
        let late_sent = late.clone();
        tokio::spawn(async move {
            tokio::time::sleep(tokio::time::Duration::from_millis(DEBOUNCE_MS / 5)).await;
            sender.send(late_sent).await.unwrap();
        });

        assert_eq!(settle(&mut receiver, first).await, late);
    }

    #[tokio::test]
    async fn test_local_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().join("nested"));

        assert!(storage.read_file("missing.json").await.unwrap().is_none());
        storage.write_file("doc.json", b"[]").await.unwrap();
        assert_eq!(storage.read_file("doc.json").await.unwrap(), Some(b"[]".to_vec()));
    }
}
