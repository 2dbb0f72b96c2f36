//! Opaque cookie session strategy.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use warden_core::config::cookie::CookieConfig;
use warden_core::result::AuthResult;
use warden_entity::{Session, User};

use crate::request::{RequestContext, SessionArtifacts};

use super::{SessionStrategy, random_token};

/// RFC-1123-style GMT date used in the cookie `Expires` field.
const EXPIRES_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Carries the session as an opaque random token in an HttpOnly cookie.
///
/// Every request holding the cookie resolves through the store; dropping
/// the stored record is enough to invalidate the client.
#[derive(Debug, Clone)]
pub struct CookieStrategy {
    config: CookieConfig,
}

impl CookieStrategy {
    pub fn new(config: CookieConfig) -> Self {
        Self { config }
    }

    /// The cookie header value carrying a live session.
    fn cookie_value(&self, token: &str, expiry: Option<DateTime<Utc>>) -> String {
        let mut value = format!("{}={token}; path=/", self.config.name);
        if let Some(expiry) = expiry {
            value.push_str(&format!("; Expires={}", expiry.format(EXPIRES_FORMAT)));
        }
        if self.config.secure {
            value.push_str("; Secure");
        }
        if let Some(same_site) = self.config.same_site {
            value.push_str(&format!("; SameSite={same_site}"));
        }
        value.push_str("; HttpOnly");
        value
    }

    /// Drops any `Set-Cookie` already queued for this cookie so one
    /// response never carries both a clearing header and a fresh token.
    fn supersede_own_cookie(&self, artifacts: &mut SessionArtifacts) {
        let prefix = format!("{}=", self.config.name);
        artifacts
            .headers
            .retain(|(name, value)| {
                !(name.eq_ignore_ascii_case("Set-Cookie") && value.starts_with(&prefix))
            });
    }
}

#[async_trait]
impl SessionStrategy for CookieStrategy {
    fn generate_session(&self, user: User, now: DateTime<Utc>) -> Session {
        let token = random_token(self.config.token_len);
        let expiry = self
            .config
            .lifetime_secs
            .map(|secs| now + Duration::seconds(secs as i64));
        Session::new(user, token, expiry)
    }

    fn current_token(&self, req: &RequestContext) -> Option<String> {
        req.cookie(&self.config.name)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn attach_session(
        &self,
        session: &Session,
        _now: DateTime<Utc>,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()> {
        if let Some(token) = &session.token {
            self.supersede_own_cookie(artifacts);
            artifacts.add_header("Set-Cookie", self.cookie_value(token, session.expiry));
        }
        Ok(())
    }

    fn clear_session(&self, artifacts: &mut SessionArtifacts) {
        // Empty value plus an epoch expiry forces client-side deletion.
        self.supersede_own_cookie(artifacts);
        artifacts.add_header(
            "Set-Cookie",
            format!(
                "{}=; path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT",
                self.config.name
            ),
        );
    }
}
