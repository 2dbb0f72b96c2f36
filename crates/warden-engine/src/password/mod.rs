//! Password strength policy and the pluggable hashing strategy.

pub mod policy;
pub mod registry;

pub use policy::PasswordPolicy;
pub use registry::{HashRegistry, HashScheme};
