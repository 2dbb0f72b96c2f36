//! Role-grant authorization for user creation.

use tracing::debug;

use warden_entity::User;

use super::token::{AclToken, permits};

/// Who may register users holding which roles.
///
/// Each entry maps a role name (or the no-role key) to an allow-list
/// evaluated with the same precedence as resource rules, but matched by
/// exact role name rather than regex. When a new user is registered with a
/// set of roles, the current principal must be authorized for every one of
/// them.
#[derive(Debug, Clone)]
pub struct RoleGrants {
    /// `(role name or no-role key, allow-list)` in declaration order.
    rules: Vec<(Option<String>, Vec<AclToken>)>,
}

impl RoleGrants {
    /// Builds grants from `(role, allow-list)` pairs; `None` as the role
    /// is the no-role key governing registration without any roles.
    pub fn new<'a, I, A>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Option<&'a str>, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(role, allow)| {
                    (
                        role.map(str::to_string),
                        allow.into_iter().map(AclToken::parse).collect(),
                    )
                })
                .collect(),
        }
    }

    /// The default policy: self-registration with no role assignment.
    pub fn self_register() -> Self {
        Self {
            rules: vec![(None, vec![AclToken::Anyone])],
        }
    }

    /// Whether the principal may create a user holding `role`
    /// (`None` for the no-role grant). A role with no entry is allowed:
    /// like resource rules, the table is open where it is silent.
    pub fn may_grant(&self, role: Option<&str>, principal: Option<&User>) -> bool {
        debug!(?role, "Checking role grant");
        for (key, allow) in &self.rules {
            if key.as_deref() == role {
                return permits(allow, principal);
            }
        }
        true
    }

    /// Checks a full set of requested roles; the empty set is checked
    /// against the no-role grant.
    pub fn may_grant_all<'a>(
        &self,
        roles: impl IntoIterator<Item = &'a str>,
        principal: Option<&User>,
    ) -> bool {
        let mut any = false;
        for role in roles {
            any = true;
            if !self.may_grant(Some(role), principal) {
                return false;
            }
        }
        if !any {
            return self.may_grant(None, principal);
        }
        true
    }
}

impl Default for RoleGrants {
    fn default() -> Self {
        Self::self_register()
    }
}
