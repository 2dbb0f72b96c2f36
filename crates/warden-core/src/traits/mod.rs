//! Traits implemented by external collaborators.

pub mod clock;

pub use clock::{Clock, SystemClock};
