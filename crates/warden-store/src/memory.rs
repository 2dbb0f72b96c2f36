//! In-memory store implementation using dashmap.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use warden_core::result::AuthResult;
use warden_entity::{Session, User};

use crate::AuthStore;

/// In-memory [`AuthStore`] keeping two mappings: username to user and
/// token to session.
///
/// Dashmap's sharded per-entry locking serializes mutations on the same
/// key, so the pruning sweep cannot race a login or logout touching the
/// same session. There is no eviction beyond explicit pruning.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// username -> User
    users: DashMap<String, User>,
    /// token -> Session
    sessions: DashMap<String, Session>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of stored users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl AuthStore for MemoryStore {
    async fn find_session(&self, token: &str) -> AuthResult<Option<Session>> {
        Ok(self.sessions.get(token).map(|s| s.clone()))
    }

    async fn list_sessions(&self) -> AuthResult<Vec<Session>> {
        Ok(self.sessions.iter().map(|s| s.clone()).collect())
    }

    async fn add_session(&self, session: Session) -> AuthResult<()> {
        if let Some(token) = session.token.clone() {
            self.sessions.insert(token, session);
        }
        Ok(())
    }

    async fn remove_session(&self, token: &str) -> AuthResult<()> {
        if self.sessions.remove(token).is_some() {
            debug!(token, "Removed session");
        }
        Ok(())
    }

    async fn find_user(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.clone()))
    }

    async fn add_user(&self, user: User) -> AuthResult<()> {
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn update_user(&self, user: User) -> AuthResult<()> {
        self.users.insert(user.username.clone(), user);
        Ok(())
    }
}
