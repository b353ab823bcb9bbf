//! In-memory session store — sessions live as long as the process.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use tutorly_core::error::SessionError;
use tutorly_core::session::{Exchange, Session, SessionId, SessionPatch, SessionStore};

/// A session store backed by a `HashMap`.
///
/// No eviction and no persistence. Each `save` merges under a single write
/// lock, so concurrent saves for the same session never lose an update.
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self, id: &SessionId) -> Result<Session, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned().unwrap_or_default())
    }

    async fn save(&self, id: &SessionId, patch: SessionPatch) -> Result<Session, SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(id.clone()).or_default();
        session.apply(patch);
        debug!(session = %id, history = session.history.len(), "Session saved");
        Ok(session.clone())
    }

    async fn append_exchange(
        &self,
        id: &SessionId,
        exchange: Exchange,
    ) -> Result<Option<Session>, SessionError> {
        let mut sessions = self.sessions.write().await;
        let Some(session) = sessions.get_mut(id) else {
            debug!(session = %id, "Session gone, exchange dropped");
            return Ok(None);
        };
        session.apply(SessionPatch::exchange(exchange));
        Ok(Some(session.clone()))
    }

    async fn clear(&self, id: &SessionId) -> Result<bool, SessionError> {
        Ok(self.sessions.write().await.remove(id).is_some())
    }

    async fn len(&self) -> Result<usize, SessionError> {
        Ok(self.sessions.read().await.len())
    }
}
