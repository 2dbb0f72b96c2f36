//! Allow-list tokens and their fixed evaluation order.

use tracing::debug;

use warden_entity::User;

/// One entry in an access rule's allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AclToken {
    /// Anyone, including unauthenticated callers (the empty marker).
    Anyone,
    /// Any authenticated principal (`*`).
    AnyAuthenticated,
    /// A literal username.
    User(String),
    /// Explicit denial of a username (`!name`).
    DenyUser(String),
    /// A role name (`#name`).
    Role(String),
    /// Explicit denial of a role (`!#name`).
    DenyRole(String),
}

impl AclToken {
    /// Parses the textual token forms: empty string for the anyone-marker,
    /// `*`, `name`, `!name`, `#role`, `!#role`.
    pub fn parse(s: &str) -> Self {
        if s.is_empty() {
            Self::Anyone
        } else if s == "*" {
            Self::AnyAuthenticated
        } else if let Some(rest) = s.strip_prefix("!#") {
            Self::DenyRole(rest.to_string())
        } else if let Some(rest) = s.strip_prefix('!') {
            Self::DenyUser(rest.to_string())
        } else if let Some(rest) = s.strip_prefix('#') {
            Self::Role(rest.to_string())
        } else {
            Self::User(s.to_string())
        }
    }
}

impl From<&str> for AclToken {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

/// Evaluates an allow-list against the current principal.
///
/// The precedence is fixed and load-bearing; reordering changes
/// authorization outcomes:
///
/// 1. anyone-marker present: allow
/// 2. no principal: deny
/// 3. `!username` present: deny
/// 4. `username` present: allow
/// 5. per held role, in stored order: `!#role` deny, then `#role` allow
/// 6. `*` present: allow
/// 7. otherwise: deny
///
/// Username checks always dominate role checks; within the role scan the
/// first matching entry for any role wins over later roles.
pub fn permits(allow: &[AclToken], principal: Option<&User>) -> bool {
    if allow.contains(&AclToken::Anyone) {
        debug!("Anyone allowed");
        return true;
    }
    let Some(user) = principal else {
        debug!("Unauthenticated denied");
        return false;
    };
    if allow.contains(&AclToken::DenyUser(user.username.clone())) {
        debug!(username = %user.username, "Explicitly denied");
        return false;
    }
    if allow.contains(&AclToken::User(user.username.clone())) {
        debug!(username = %user.username, "Explicitly allowed");
        return true;
    }
    for role in &user.roles {
        if allow.contains(&AclToken::DenyRole(role.name.clone())) {
            debug!(role = %role.name, "Explicitly denied by role");
            return false;
        }
        if allow.contains(&AclToken::Role(role.name.clone())) {
            debug!(role = %role.name, "Explicitly allowed by role");
            return true;
        }
    }
    if allow.contains(&AclToken::AnyAuthenticated) {
        debug!("Implicitly allowed");
        return true;
    }
    debug!("Implicitly denied");
    false
}
