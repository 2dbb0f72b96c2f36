//! Injectable UTC clock.
//!
//! Session expiry is evaluated against the clock of invocation, not the
//! clock at construction, so every component that checks expiry takes its
//! notion of "now" from a shared [`Clock`]. Tests substitute a manual clock.

use chrono::{DateTime, Utc};

/// Source of the current UTC instant.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
