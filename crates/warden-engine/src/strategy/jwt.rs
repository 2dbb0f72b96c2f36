//! Two-token signed session strategy.
//!
//! A login issues a short-lived signed access token plus an opaque
//! refresh token. The refresh token is stored server-side like a cookie
//! session and is the only revocable handle; access tokens are verified
//! statelessly and never looked up in the store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use warden_core::config::jwt::JwtConfig;
use warden_core::result::AuthResult;
use warden_entity::{Session, User};
use warden_store::AuthStore;

use crate::jwt::{JwtDecoder, JwtEncoder, JwtKeys};
use crate::request::{RequestContext, SessionArtifacts};

use super::{SessionStrategy, random_token};

/// Request parameter carrying the refresh token.
const REFRESH_PARAM: &str = "refresh_token";
/// Response body field carrying the access token.
const ACCESS_PARAM: &str = "access_token";

/// Carries the session as a signed access token with a stored refresh
/// token backing it.
#[derive(Debug, Clone)]
pub struct JwtStrategy {
    encoder: JwtEncoder,
    decoder: JwtDecoder,
    refresh_ttl_minutes: i64,
    refresh_token_len: usize,
    rotate_refresh_tokens: bool,
}

impl JwtStrategy {
    /// Creates the strategy from configuration and already-loaded keys.
    ///
    /// Key loading itself happens in [`JwtKeys`]; missing or mismatched
    /// key material never gets this far.
    pub fn new(config: &JwtConfig, keys: Arc<JwtKeys>) -> Self {
        Self {
            encoder: JwtEncoder::new(config, keys.clone()),
            decoder: JwtDecoder::new(keys),
            refresh_ttl_minutes: config.refresh_ttl_minutes as i64,
            refresh_token_len: config.refresh_token_len,
            rotate_refresh_tokens: config.rotate_refresh_tokens,
        }
    }

    /// Resolves a verified, unexpired bearer token to a synthetic session.
    ///
    /// The session carries no token: nothing is stored for it, so logout
    /// cannot revoke it and it simply ages out at `exp`.
    async fn resolve_bearer(
        &self,
        req: &RequestContext,
        store: &dyn AuthStore,
    ) -> AuthResult<Option<Session>> {
        let Some(bearer) = req.bearer.as_deref() else {
            return Ok(None);
        };
        let Some(claims) = self.decoder.decode(bearer) else {
            return Ok(None);
        };
        match store.find_user(&claims.sub).await? {
            Some(user) => Ok(Some(Session::virtual_session(user, claims.expires_at()))),
            None => {
                debug!(subject = %claims.sub, "Verified token for unknown user");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SessionStrategy for JwtStrategy {
    fn generate_session(&self, user: User, now: DateTime<Utc>) -> Session {
        let token = random_token(self.refresh_token_len);
        let expiry = now + Duration::minutes(self.refresh_ttl_minutes);
        Session::new(user, token, Some(expiry))
    }

    fn current_token(&self, req: &RequestContext) -> Option<String> {
        req.param(REFRESH_PARAM)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Stored refresh-token sessions win over bearer access tokens.
    async fn resolve_session(
        &self,
        req: &RequestContext,
        store: &dyn AuthStore,
        _now: DateTime<Utc>,
    ) -> AuthResult<Option<Session>> {
        if let Some(token) = self.current_token(req) {
            if let Some(session) = store.find_session(&token).await? {
                return Ok(Some(session));
            }
        }
        self.resolve_bearer(req, store).await
    }

    fn attach_session(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()> {
        let (access_token, _) = self.encoder.issue(&session.user.username, now)?;
        artifacts.set_param(ACCESS_PARAM, access_token);
        if let Some(refresh_token) = &session.token {
            artifacts.set_param(REFRESH_PARAM, refresh_token.as_str());
        }
        Ok(())
    }

    /// Nothing to clear client-side: the access token is stateless and the
    /// refresh token lives only in the store.
    fn clear_session(&self, _artifacts: &mut SessionArtifacts) {}

    fn response_keys(&self) -> &'static [&'static str] {
        &[ACCESS_PARAM, REFRESH_PARAM]
    }

    fn supports_refresh(&self) -> bool {
        true
    }

    fn rotate_on_refresh(&self) -> bool {
        self.rotate_refresh_tokens
    }
}
