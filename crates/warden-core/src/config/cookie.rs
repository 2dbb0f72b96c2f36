//! Cookie session strategy configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Settings for the opaque-cookie session strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Name of the session cookie.
    #[serde(default = "default_name")]
    pub name: String,
    /// Number of hex characters in the random session token.
    #[serde(default = "default_token_len")]
    pub token_len: usize,
    /// Session lifetime in seconds. `None` means a session cookie that
    /// never expires server-side until explicit logout.
    #[serde(default)]
    pub lifetime_secs: Option<u64>,
    /// Sets the `Secure` cookie flag; enable when the transport is TLS.
    #[serde(default)]
    pub secure: bool,
    /// Optional `SameSite` cookie policy.
    #[serde(default)]
    pub same_site: Option<SameSite>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            token_len: default_token_len(),
            lifetime_secs: None,
            secure: false,
            same_site: None,
        }
    }
}

/// `SameSite` cookie policy. Only `Lax` and `Strict` are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    /// Cookie is sent on top-level navigations.
    Lax,
    /// Cookie is only sent in a first-party context.
    Strict,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Lax => write!(f, "Lax"),
            SameSite::Strict => write!(f, "Strict"),
        }
    }
}

fn default_name() -> String {
    "SESSION".to_string()
}

fn default_token_len() -> usize {
    20
}
