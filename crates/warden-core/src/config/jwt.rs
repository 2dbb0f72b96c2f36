//! JWT session strategy configuration.
//!
//! Key material is not part of the serde config: signing keys are loaded
//! through the engine's key-management API so secrets never round-trip
//! through configuration files.

use serde::{Deserialize, Serialize};

/// Settings for the signed-token session strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signature algorithm identifier, e.g. `HS256`, `RS256`, `ES256`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Access token lifetime in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token lifetime in minutes.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_minutes: u64,
    /// Number of hex characters in the opaque refresh token.
    #[serde(default = "default_refresh_token_len")]
    pub refresh_token_len: usize,
    /// Rotate the refresh token on every refresh request, invalidating
    /// the old one.
    #[serde(default = "default_true")]
    pub rotate_refresh_tokens: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_minutes: default_refresh_ttl(),
            refresh_token_len: default_refresh_token_len(),
            rotate_refresh_tokens: true,
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    1440
}

fn default_refresh_token_len() -> usize {
    100
}

fn default_true() -> bool {
    true
}
