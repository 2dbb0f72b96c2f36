//! Engine configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate. Each
//! sub-module represents a logical configuration section. Values are
//! validated once, at engine construction; a bad value there is a fatal
//! [`Configuration`](crate::error::ErrorKind::Configuration) error, never a
//! per-request failure.

pub mod cookie;
pub mod jwt;
pub mod password;
pub mod session;

use serde::{Deserialize, Serialize};

use self::cookie::CookieConfig;
use self::jwt::JwtConfig;
use self::password::PasswordConfig;
use self::session::SessionConfig;

use crate::error::AuthError;

/// Root engine configuration.
///
/// This struct is the top-level deserialization target for the merged
/// configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Password policy and hashing settings.
    #[serde(default)]
    pub password: PasswordConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Cookie strategy settings.
    #[serde(default)]
    pub cookie: CookieConfig,
    /// JWT strategy settings.
    #[serde(default)]
    pub jwt: JwtConfig,
    /// Response shaping settings.
    #[serde(default)]
    pub response: ResponseConfig,
}

/// Selects the response shape emitted by the endpoint operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResponseConfig {
    /// Emit a structured JSON body with a fixed key set (including `error`)
    /// instead of a plain empty response. The JWT strategy always responds
    /// with JSON regardless of this flag, since its tokens travel in the
    /// body.
    #[serde(default)]
    pub json: bool,
}

/// Upper bound on configured lifetimes and intervals, in seconds.
/// Roughly a century; far below where timestamp arithmetic overflows.
const MAX_DURATION_SECS: u64 = 100 * 365 * 24 * 60 * 60;

fn bounded(field: &str, value: u64, max: u64) -> Result<(), AuthError> {
    if value > max {
        return Err(AuthError::configuration(format!(
            "{field} = {value} exceeds the supported maximum of {max}"
        )));
    }
    Ok(())
}

impl AuthConfig {
    /// Checks that configured lifetimes and intervals are representable.
    ///
    /// Run once at engine construction so absurd values fail there rather
    /// than panicking in timestamp arithmetic mid-request.
    pub fn validate(&self) -> Result<(), AuthError> {
        if let Some(secs) = self.cookie.lifetime_secs {
            bounded("cookie.lifetime_secs", secs, MAX_DURATION_SECS)?;
        }
        if let Some(secs) = self.session.prune_every_secs {
            bounded("session.prune_every_secs", secs, MAX_DURATION_SECS)?;
        }
        bounded(
            "jwt.access_ttl_minutes",
            self.jwt.access_ttl_minutes,
            MAX_DURATION_SECS / 60,
        )?;
        bounded(
            "jwt.refresh_ttl_minutes",
            self.jwt.refresh_ttl_minutes,
            MAX_DURATION_SECS / 60,
        )?;
        Ok(())
    }

    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `WARDEN_`.
    pub fn load(env: &str) -> Result<Self, AuthError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WARDEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AuthError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
