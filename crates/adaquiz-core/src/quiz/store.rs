use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::quiz::session::QuizSession;

pub type SharedSession = Arc<Mutex<QuizSession>>;

/// Identifies one quiz session of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// In-memory map of the active quiz sessions.
///
/// Every session sits behind its own lock, so requests of different clients never wait on each other
/// while a question is generated.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SharedSession>>>,
    ttl: Duration,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn create(&self) -> (SessionId, SharedSession) {
        self.get_or_create(None).await
    }

    /// Returns the session with the given id, or a new session under a freshly minted id when the id is
    /// unknown or missing. Ids are never taken over from the client.
    pub async fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SharedSession) {
        let mut sessions = self.sessions.lock().await;
        if let Some(id) = id
            && let Some(session) = sessions.get(&id)
        {
            return (id, Arc::clone(session));
        }

        if let Some(unknown) = id {
            tracing::debug!(%unknown, "unknown quiz session, minting a new id");
        }
        let id = SessionId::new();
        let session = Arc::new(Mutex::new(QuizSession::new()));
        sessions.insert(id, Arc::clone(&session));
        tracing::debug!(%id, "created quiz session");
        (id, session)
    }

    pub async fn get(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.lock().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: SessionId) -> Option<SharedSession> {
        self.sessions.lock().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Drops sessions idle for longer than the ttl. Sessions currently in use are skipped.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(self.ttl) else {
            return 0;
        };

        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => now - session.last_activity() <= ttl,
            Err(_) => true,
        });
        let pruned = before - sessions.len();

        if pruned > 0 {
            tracing::info!(pruned, remaining = sessions.len(), "pruned expired quiz sessions");
        }
        pruned
    }
}
