//! Session-carrying strategies.
//!
//! A [`SessionStrategy`] decides how an authenticated session travels with
//! the client: as an opaque cookie token, or as a signed access token plus
//! a stored refresh token. The lifecycle manager holds exactly one
//! strategy and is otherwise strategy-agnostic.

pub mod cookie;
pub mod jwt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;

use warden_core::result::AuthResult;
use warden_entity::{Session, User};
use warden_store::AuthStore;

use crate::request::{RequestContext, SessionArtifacts};

pub use cookie::CookieStrategy;
pub use jwt::JwtStrategy;

/// How a session is created, carried across requests, and torn down.
#[async_trait]
pub trait SessionStrategy: Send + Sync + 'static {
    /// Creates a fresh session for a just-authenticated user.
    fn generate_session(&self, user: User, now: DateTime<Utc>) -> Session;

    /// Extracts the stored-session token carried by the request, if any.
    fn current_token(&self, req: &RequestContext) -> Option<String>;

    /// Resolves the session the request carries, without expiry checks.
    ///
    /// The default looks the carried token up in the store; strategies
    /// with a stateless fallback override this.
    async fn resolve_session(
        &self,
        req: &RequestContext,
        store: &dyn AuthStore,
        _now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        match self.current_token(req) {
            Some(token) => store.find_session(&token).await,
            None => Ok(None),
        }
    }

    /// Emits the session-carrying artifacts for a freshly issued session.
    fn attach_session(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()>;

    /// Emits the artifacts that tell the client to drop its session.
    fn clear_session(&self, artifacts: &mut SessionArtifacts);

    /// Body fields this strategy populates on success responses.
    fn response_keys(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether this strategy serves the token-refresh operation.
    fn supports_refresh(&self) -> bool {
        false
    }

    /// Whether a refresh replaces the stored session instead of re-using
    /// it. Only consulted when [`supports_refresh`](Self::supports_refresh)
    /// is true.
    fn rotate_on_refresh(&self) -> bool {
        false
    }
}

/// Generates a cryptographically random hex token of exactly `len` chars.
pub(crate) fn random_token(len: usize) -> String {
    let mut bytes = vec![0u8; len.div_ceil(2)];
    rand::rng().fill_bytes(&mut bytes);
    let mut token = hex::encode(bytes);
    token.truncate(len);
    token
}
