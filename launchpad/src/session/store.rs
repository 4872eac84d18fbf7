//! Session store

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::LaunchpadError;
use crate::models::session::Session;

/// Opaque id presented by the browser in the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| LaunchpadError::SessionError(format!("Invalid session id: {}", e)))
    }
}

/// Storage for browser sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session, `None` if the id is unknown
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, LaunchpadError>;

    /// Create or replace a session
    async fn save(&self, id: &SessionId, session: Session) -> Result<(), LaunchpadError>;

    /// Drop a session, returning it if it existed
    async fn remove(&self, id: &SessionId) -> Result<Option<Session>, LaunchpadError>;
}

/// Process-local session store.
///
/// Entries live until they are replaced at sign-in or the process exits.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, LaunchpadError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn save(&self, id: &SessionId, session: Session) -> Result<(), LaunchpadError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*id, session);
        Ok(())
    }

    async fn remove(&self, id: &SessionId) -> Result<Option<Session>, LaunchpadError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id))
    }
}
