//! Access token claims payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims embedded in every access token. All numeric fields are seconds
/// since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject, the username.
    pub sub: String,
    /// Expiration timestamp.
    pub exp: i64,
    /// Not-before timestamp, set to the issue time.
    pub nbf: i64,
    /// Issued-at timestamp.
    pub iat: i64,
}

impl Claims {
    /// Returns the expiry as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
