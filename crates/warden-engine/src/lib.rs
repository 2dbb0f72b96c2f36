//! # warden-engine
//!
//! Embeddable authentication/authorization engine: it decides who a caller
//! is, whether they may reach a resource, and how that identity is carried
//! across requests.
//!
//! ## Modules
//!
//! - `password`: strength policy and the named hash scheme registry
//! - `acl`: ordered-rule access control for resources and role grants
//! - `jwt`: signed token claims, key management, encode/decode
//! - `strategy`: the session-carrying strategies (cookie, JWT)
//! - `session`: lifecycle manager and expired-session pruning
//! - `request`: transport-neutral request/response surfaces
//! - `endpoint`: lifecycle endpoint dispatch and response shaping
//!
//! The surrounding request handler calls into the engine at four points
//! per request: resolve the current session, authorize the request against
//! the ACL, invoke a lifecycle operation on its endpoints, and emit or
//! clear the session-carrying artifact via the active strategy.

pub mod acl;
pub mod endpoint;
pub mod jwt;
pub mod password;
pub mod request;
pub mod session;
pub mod strategy;

pub use acl::{AclPolicy, AclToken, RoleGrants};
pub use endpoint::{AuthResponse, Endpoint};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, JwtKeys, KeySource};
pub use password::{HashRegistry, HashScheme, PasswordPolicy};
pub use request::{RequestContext, SessionArtifacts};
pub use session::{AuthEngine, AuthEngineBuilder, SessionPruner};
pub use strategy::{CookieStrategy, JwtStrategy, SessionStrategy};
