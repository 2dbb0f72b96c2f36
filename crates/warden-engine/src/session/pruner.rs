//! Throttled sweep of expired sessions.

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use warden_core::config::session::SessionConfig;
use warden_core::result::AuthResult;
use warden_store::AuthStore;

/// Sweeps expired sessions out of the store, at most once per configured
/// interval.
///
/// The gate is checked once per incoming request. An interval of zero
/// sweeps before every request; no interval disables sweeping entirely.
/// Expiry is still enforced lazily on every session lookup, so sweeping
/// only bounds the store's footprint, never correctness.
#[derive(Debug)]
pub struct SessionPruner {
    /// Minimum interval between sweeps. `None` disables sweeping.
    every: Option<Duration>,
    /// Instant of the last completed sweep.
    last_run: Mutex<Option<DateTime<Utc>>>,
}

impl SessionPruner {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            every: config
                .prune_every_secs
                .map(|secs| Duration::seconds(secs as i64)),
            last_run: Mutex::new(None),
        }
    }

    /// Sweeps if the interval since the last sweep has elapsed.
    ///
    /// Returns the number of sessions removed (zero when the gate held the
    /// sweep back). Expired tokens are collected first and removed one by
    /// one through the store's own per-key serialization, so a concurrent
    /// login or logout on the same token cannot be torn.
    pub async fn maybe_prune(&self, store: &dyn AuthStore, now: DateTime<Utc>) -> AuthResult<usize> {
        let Some(every) = self.every else {
            return Ok(0);
        };

        {
            let mut last_run = self.last_run.lock().await;
            if let Some(last) = *last_run {
                if now < last + every {
                    return Ok(0);
                }
            }
            *last_run = Some(now);
        }

        debug!("Pruning expired sessions");
        let mut removed = 0;
        for session in store.list_sessions().await? {
            if session.has_expired(now) {
                if let Some(token) = &session.token {
                    debug!(token, "Removing expired session");
                    store.remove_session(token).await?;
                    removed += 1;
                }
            }
        }
        Ok(removed)
    }
}
