//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Session pruning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Minimum number of seconds between sweeps of expired sessions.
    /// The gate is checked once per incoming request: `Some(0)` sweeps
    /// before every request, `None` disables sweeping entirely. Expiry is
    /// still enforced lazily on every session lookup either way.
    #[serde(default = "default_prune_every")]
    pub prune_every_secs: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prune_every_secs: default_prune_every(),
        }
    }
}

fn default_prune_every() -> Option<u64> {
    Some(0)
}
