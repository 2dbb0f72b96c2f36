//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::User;

/// An authenticated session.
///
/// Sessions are created by the login/refresh flow, re-validated on every
/// request, and destroyed either explicitly (logout) or implicitly (expiry
/// discovered during lookup or pruning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The user this session belongs to.
    pub user: User,
    /// The opaque session token. `None` marks a virtual session
    /// reconstructed from a verified stateless token rather than a stored
    /// record.
    pub token: Option<String>,
    /// Absolute UTC expiry. `None` means the session never expires.
    pub expiry: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a stored session with the given token.
    pub fn new(user: User, token: impl Into<String>, expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            user,
            token: Some(token.into()),
            expiry,
        }
    }

    /// Creates a virtual session reconstructed from verified token claims.
    pub fn virtual_session(user: User, expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            user,
            token: None,
            expiry,
        }
    }

    /// Checks whether the session has expired as of `now`.
    ///
    /// False iff the expiry is unset or strictly in the future. The caller
    /// injects the clock, so the result is deterministic relative to it.
    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            None => false,
            Some(expiry) => expiry <= now,
        }
    }
}
