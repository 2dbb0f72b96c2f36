//! # warden-store
//!
//! The [`AuthStore`] interface the engine persists users and sessions
//! through, plus the default in-memory backend. Stores may be backed by
//! memory, disk, or a remote service; the engine tolerates blocking I/O
//! behind the async interface.

pub mod memory;

use async_trait::async_trait;

use warden_core::result::AuthResult;
use warden_entity::{Role, Session, User};

pub use memory::MemoryStore;

/// Canonical storage for live users and sessions.
///
/// The store exclusively owns the canonical set of both. All mutations
/// must be serialized per logical key (per username, per token) so that
/// pruning cannot race a concurrent login or logout; reads must observe a
/// consistent snapshot.
#[async_trait]
pub trait AuthStore: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the session recorded under the given token, if any.
    async fn find_session(&self, token: &str) -> AuthResult<Option<Session>>;

    /// Returns every stored session.
    async fn list_sessions(&self) -> AuthResult<Vec<Session>>;

    /// Records a session. The session is guaranteed to carry a token.
    async fn add_session(&self, session: Session) -> AuthResult<()>;

    /// Deletes the session recorded under the given token.
    /// Removal of an absent token is a no-op.
    async fn remove_session(&self, token: &str) -> AuthResult<()>;

    /// Returns the user with the given username, if any.
    async fn find_user(&self, username: &str) -> AuthResult<Option<User>>;

    /// Records a new user. The engine checks for duplicates beforehand.
    async fn add_user(&self, user: User) -> AuthResult<()>;

    /// Persists a mutated user (post-password-change hook). Backends with
    /// no write-back needs may no-op.
    async fn update_user(&self, user: User) -> AuthResult<()>;

    /// Constructs a user record for this backend. The digest is already
    /// transformed by the configured hash scheme.
    fn create_user(&self, username: &str, digest: &str, roles: Vec<Role>) -> User {
        User::new(username, digest, roles)
    }
}
