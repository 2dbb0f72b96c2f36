//! Access token creation with configurable signing and TTL.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Header, encode};

use warden_core::config::jwt::JwtConfig;
use warden_core::error::AuthError;
use warden_core::result::AuthResult;

use super::claims::Claims;
use super::keys::JwtKeys;

/// Creates signed access tokens.
#[derive(Debug, Clone)]
pub struct JwtEncoder {
    /// Signing keys and algorithm.
    keys: Arc<JwtKeys>,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
}

impl JwtEncoder {
    /// Creates a new encoder from configuration and loaded keys.
    pub fn new(config: &JwtConfig, keys: Arc<JwtKeys>) -> Self {
        Self {
            keys,
            access_ttl_minutes: config.access_ttl_minutes as i64,
        }
    }

    /// Issues a signed access token for the given username.
    ///
    /// `iat` and `nbf` are both the issue instant; `exp` is the issue
    /// instant plus the configured TTL. Returns the token and its expiry,
    /// at the whole-second precision the `exp` claim carries.
    pub fn issue(&self, username: &str, now: DateTime<Utc>) -> AuthResult<(String, DateTime<Utc>)> {
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = Claims {
            sub: username.to_string(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iat: now.timestamp(),
        };
        // Sessions rebuilt from a decoded token must compare equal to the
        // one handed out here, so report the claim's truncated expiry.
        let exp = claims
            .expires_at()
            .ok_or_else(|| AuthError::internal("Access token expiry out of range"))?;

        let token = encode(&Header::new(self.keys.algorithm), &claims, self.keys.encoding())
            .map_err(|e| AuthError::internal(format!("Failed to encode access token: {e}")))?;

        Ok((token, exp))
    }
}
