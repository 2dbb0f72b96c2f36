//! # warden-core
//!
//! Core crate for Warden. Contains configuration schemas, the injectable
//! clock trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Warden crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AuthError;
pub use result::AuthResult;
