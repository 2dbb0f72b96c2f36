//! Ordered access rules over request subjects.

use regex::Regex;
use tracing::debug;

use warden_core::error::AuthError;
use warden_core::result::AuthResult;
use warden_entity::User;

use super::token::{AclToken, permits};

/// An ordered pair of a regex matcher and an allow-list.
///
/// The matcher is applied to the subject value (`"{METHOD} {path}"` for
/// resource rules) as an unanchored search.
#[derive(Debug, Clone)]
pub struct AccessRule {
    /// Compiled subject matcher.
    pattern: Regex,
    /// Allow-list evaluated when this rule wins.
    allow: Vec<AclToken>,
}

impl AccessRule {
    /// Compiles a rule from a regex pattern and textual allow-list
    /// entries. A malformed pattern is a fatal configuration error.
    pub fn new<'a>(
        pattern: &str,
        allow: impl IntoIterator<Item = &'a str>,
    ) -> AuthResult<Self> {
        let tokens = allow.into_iter().map(AclToken::parse).collect();
        Self::with_tokens(pattern, tokens)
    }

    /// Compiles a rule from a regex pattern and parsed tokens.
    pub fn with_tokens(pattern: &str, allow: Vec<AclToken>) -> AuthResult<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| AuthError::configuration(format!("Invalid ACL pattern: {e}")))?;
        Ok(Self { pattern, allow })
    }

    /// Whether this rule's matcher matches the subject.
    pub fn matches(&self, subject: &str) -> bool {
        self.pattern.is_match(subject)
    }

    /// Evaluates this rule's allow-list against the principal.
    pub fn permits(&self, principal: Option<&User>) -> bool {
        permits(&self.allow, principal)
    }
}

/// The resource authorization policy: an ordered rule list, or the reduced
/// legacy form of protected path filters.
#[derive(Debug, Clone)]
pub enum AclPolicy {
    /// Ordered rules matched against `"{METHOD} {path}"`; the first
    /// matching rule wins and later rules are not consulted.
    Rules(Vec<AccessRule>),
    /// Legacy reduced mode: a single compiled rule matched against the
    /// bare pathname, allowing any authenticated principal. `None` when the
    /// filter list was empty.
    ProtectedPaths(Option<AccessRule>),
}

impl AclPolicy {
    /// A policy with no rules: everything is allowed.
    pub fn open() -> Self {
        Self::Rules(Vec::new())
    }

    /// Builds an ordered rule policy from `(pattern, allow-list)` pairs.
    pub fn rules<'a, I, A>(rules: I) -> AuthResult<Self>
    where
        I: IntoIterator<Item = (&'a str, A)>,
        A: IntoIterator<Item = &'a str>,
    {
        let compiled = rules
            .into_iter()
            .map(|(pattern, allow)| AccessRule::new(pattern, allow))
            .collect::<AuthResult<Vec<_>>>()?;
        Ok(Self::Rules(compiled))
    }

    /// Builds the legacy reduced policy from path filters.
    ///
    /// A filter beginning with `/` is matched at the beginning of the
    /// request path; any other filter is matched as a path component.
    /// Either way the filter must match until the end of the path or until
    /// another `/`. A matched path requires authentication; any
    /// authenticated principal is allowed.
    pub fn protected_paths<'a>(filters: impl IntoIterator<Item = &'a str>) -> AuthResult<Self> {
        let parts: Vec<String> = filters
            .into_iter()
            .map(|f| {
                if let Some(rest) = f.strip_prefix('/') {
                    format!("^/{}(/|$)", regex::escape(rest))
                } else {
                    format!("(^|/){}(/|$)", regex::escape(f))
                }
            })
            .collect();
        if parts.is_empty() {
            return Ok(Self::ProtectedPaths(None));
        }
        let rule =
            AccessRule::with_tokens(&parts.join("|"), vec![AclToken::AnyAuthenticated])?;
        Ok(Self::ProtectedPaths(Some(rule)))
    }

    /// Authorizes a request against the policy.
    ///
    /// Rules are scanned in declaration order; the first rule whose
    /// matcher matches the subject wins. If no rule matches, the default
    /// is allow: the policy is open where it is silent.
    pub fn authorizes(&self, method: &str, path: &str, principal: Option<&User>) -> bool {
        match self {
            Self::Rules(rules) => {
                let subject = format!("{method} {path}");
                debug!(subject, "Checking authorization");
                for rule in rules {
                    if rule.matches(&subject) {
                        return rule.permits(principal);
                    }
                }
                true
            }
            Self::ProtectedPaths(rule) => {
                debug!(path, "Checking authorization (protected paths)");
                match rule {
                    Some(rule) if rule.matches(path) => rule.permits(principal),
                    _ => true,
                }
            }
        }
    }
}
