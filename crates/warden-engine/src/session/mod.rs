//! Session lifecycle: the engine facade and expired-session pruning.

pub mod manager;
pub mod pruner;

pub use manager::{AuthEngine, AuthEngineBuilder};
pub use pruner::SessionPruner;
