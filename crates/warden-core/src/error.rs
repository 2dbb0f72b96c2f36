//! Unified error types for Warden.
//!
//! All crates map their internal errors into [`AuthError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Authentication failed (bad credentials, no valid session).
    Authentication,
    /// The caller is not allowed to perform the action (ACL denial).
    Authorization,
    /// Registration of a username that already exists.
    UserExists,
    /// An operation referenced an unknown username.
    NoSuchUser,
    /// An empty or malformed username was supplied at registration.
    InvalidUsername,
    /// A new password failed the strength policy.
    WeakPassword,
    /// A required endpoint parameter is missing or malformed.
    EndpointArgs,
    /// A recognized endpoint was called with a disallowed method.
    MethodNotAllowed,
    /// A fatal configuration problem (unsupported algorithm, missing keys).
    Configuration,
    /// The backing store failed.
    Store,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "AUTHENTICATION"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::UserExists => write!(f, "USER_EXISTS"),
            Self::NoSuchUser => write!(f, "NO_SUCH_USER"),
            Self::InvalidUsername => write!(f, "INVALID_USERNAME"),
            Self::WeakPassword => write!(f, "WEAK_PASSWORD"),
            Self::EndpointArgs => write!(f, "ENDPOINT_ARGS"),
            Self::MethodNotAllowed => write!(f, "METHOD_NOT_ALLOWED"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Store => write!(f, "STORE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorKind {
    /// Maps the kind to the HTTP status code surfaced at the endpoint
    /// boundary.
    ///
    /// Authentication and authorization failures are both 401 and carry no
    /// detail about why access was denied.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Authentication | Self::Authorization => 401,
            Self::UserExists | Self::NoSuchUser | Self::InvalidUsername | Self::WeakPassword => {
                400
            }
            Self::EndpointArgs => 404,
            Self::MethodNotAllowed => 405,
            Self::Configuration | Self::Store | Self::Serialization | Self::Internal => 500,
        }
    }
}

/// The unified error used throughout Warden.
///
/// All crate-specific errors are mapped into `AuthError` using `From` impls
/// or explicit `.map_err()` calls. Every business-logic failure is caught at
/// the endpoint-operation boundary and translated to a status code; only
/// `Configuration` errors are fatal, and those are raised at construction
/// time, never per request.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AuthError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AuthError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authentication, message)
    }

    /// Create an authorization (ACL denial) error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// Create a duplicate-user error.
    pub fn user_exists(username: &str) -> Self {
        Self::new(
            ErrorKind::UserExists,
            format!("User {username} already exists"),
        )
    }

    /// Create an unknown-user error.
    pub fn no_such_user(username: &str) -> Self {
        Self::new(ErrorKind::NoSuchUser, format!("No such user {username}"))
    }

    /// Create an invalid-username error.
    pub fn invalid_username(username: &str) -> Self {
        Self::new(
            ErrorKind::InvalidUsername,
            format!("Invalid username {username:?}"),
        )
    }

    /// Create a weak-password error.
    pub fn weak_password(username: &str) -> Self {
        Self::new(
            ErrorKind::WeakPassword,
            format!("Bad password for user {username}"),
        )
    }

    /// Create a missing/malformed endpoint parameter error.
    pub fn endpoint_args(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EndpointArgs, message)
    }

    /// Create a disallowed-method error.
    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            ErrorKind::MethodNotAllowed,
            format!("Method {method} not allowed here"),
        )
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AuthError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
