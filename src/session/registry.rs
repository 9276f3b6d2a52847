//! In-memory registry of active document sessions.

use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::DocumentSession;

pub type SharedSession = Arc<Mutex<DocumentSession>>;

/// Sessions keyed by id. Idle sessions expire after the configured TTL.
///
/// Each entry is locked independently; the lock is never held across an
/// `.await`.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Cache<Uuid, SharedSession>,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration, max_sessions: u64) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(idle_ttl)
            .max_capacity(max_sessions)
            .build();

        Self { sessions }
    }

    pub async fn insert(&self, session: DocumentSession) -> SharedSession {
        let id = session.id();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone()).await;
        log::info!("Session {} created", id);
        shared
    }

    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        self.sessions.get(id).await
    }

    pub async fn remove(&self, id: &Uuid) -> Option<SharedSession> {
        let removed = self.sessions.remove(id).await;
        if removed.is_some() {
            log::info!("Session {} closed", id);
        }
        removed
    }
}
