//! User entity model.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// A registered user.
///
/// Created by registration or bulk load, mutated only by a password
/// change, never deleted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique, non-empty login name.
    pub username: String,
    /// Password digest in the configured hash scheme.
    #[serde(skip_serializing)]
    pub password: String,
    /// Roles held by the user, in grant order.
    pub roles: Vec<Role>,
}

impl User {
    /// Creates a user, normalizing the role list.
    ///
    /// Each element may be a role name or an already-constructed [`Role`].
    /// Construction performs no I/O and cannot fail; username and digest
    /// validity are the engine's concern.
    pub fn new<R>(
        username: impl Into<String>,
        password: impl Into<String>,
        roles: impl IntoIterator<Item = R>,
    ) -> Self
    where
        R: Into<Role>,
    {
        Self {
            username: username.into(),
            password: password.into(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks whether the user holds a role with the given name.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }
}
