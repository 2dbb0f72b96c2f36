//! # warden-entity
//!
//! Identity value types shared across the Warden engine. All three types
//! are plain immutable-after-construction records; the only externally
//! mutable field is a user's password digest, which is updated through the
//! engine's password-change operation.

pub mod role;
pub mod session;
pub mod user;

pub use role::Role;
pub use session::Session;
pub use user::User;
