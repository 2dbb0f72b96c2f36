//! Rule-based access control.
//!
//! One allow-list algorithm serves two use sites: resource authorization
//! (regex matchers over `"{METHOD} {path}"`) and role-grant authorization
//! at registration time (exact role-name matchers).

pub mod grants;
pub mod rule;
pub mod token;

pub use grants::RoleGrants;
pub use rule::{AccessRule, AclPolicy};
pub use token::AclToken;
