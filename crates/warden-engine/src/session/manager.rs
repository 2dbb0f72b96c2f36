//! The engine facade.
//!
//! [`AuthEngine`] composes the store, the active session strategy, the
//! password machinery, and the ACL tables behind the handful of queries a
//! request handler needs: resolve the current session, authorize the
//! request, and run the lifecycle operations (login, logout, register,
//! password change, token refresh). The engine itself never touches a
//! transport.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info};

use warden_core::config::AuthConfig;
use warden_core::error::{AuthError, ErrorKind};
use warden_core::result::AuthResult;
use warden_core::traits::{Clock, SystemClock};
use warden_entity::{Role, Session, User};
use warden_store::AuthStore;

use crate::acl::{AclPolicy, RoleGrants};
use crate::password::{HashRegistry, HashScheme, PasswordPolicy};
use crate::request::{RequestContext, SessionArtifacts};
use crate::session::SessionPruner;
use crate::strategy::SessionStrategy;

/// Builds an [`AuthEngine`], validating configuration along the way.
///
/// The hash scheme is resolved at [`build`](Self::build) time: an
/// unsupported algorithm name refuses to construct the engine instead of
/// failing on the first login.
pub struct AuthEngineBuilder {
    config: AuthConfig,
    store: Arc<dyn AuthStore>,
    strategy: Arc<dyn SessionStrategy>,
    registry: HashRegistry,
    acl: AclPolicy,
    grants: RoleGrants,
    clock: Arc<dyn Clock>,
}

impl AuthEngineBuilder {
    /// Replaces the default hash scheme registry.
    pub fn registry(mut self, registry: HashRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the resource authorization policy. Defaults to open.
    pub fn acl(mut self, acl: AclPolicy) -> Self {
        self.acl = acl;
        self
    }

    /// Sets the role-grant policy for registration. Defaults to
    /// self-registration without roles.
    pub fn grants(mut self, grants: RoleGrants) -> Self {
        self.grants = grants;
        self
    }

    /// Replaces the wall clock, for tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Validates the configuration and constructs the engine.
    pub fn build(self) -> AuthResult<AuthEngine> {
        self.config.validate()?;
        let scheme = self.registry.resolve(&self.config.password.algorithm)?;
        Ok(AuthEngine {
            policy: PasswordPolicy::new(&self.config.password),
            pruner: SessionPruner::new(&self.config.session),
            json_responses: self.config.response.json,
            store: self.store,
            strategy: self.strategy,
            scheme,
            acl: self.acl,
            grants: self.grants,
            clock: self.clock,
        })
    }
}

/// Authentication and authorization engine.
pub struct AuthEngine {
    store: Arc<dyn AuthStore>,
    strategy: Arc<dyn SessionStrategy>,
    scheme: Arc<dyn HashScheme>,
    policy: PasswordPolicy,
    acl: AclPolicy,
    grants: RoleGrants,
    clock: Arc<dyn Clock>,
    pruner: SessionPruner,
    json_responses: bool,
}

impl AuthEngine {
    /// Starts building an engine over the given store and strategy.
    pub fn builder(
        config: AuthConfig,
        store: Arc<dyn AuthStore>,
        strategy: Arc<dyn SessionStrategy>,
    ) -> AuthEngineBuilder {
        AuthEngineBuilder {
            config,
            store,
            strategy,
            registry: HashRegistry::with_defaults(),
            acl: AclPolicy::open(),
            grants: RoleGrants::self_register(),
            clock: Arc::new(SystemClock),
        }
    }

    /// The store the engine persists through.
    pub fn store(&self) -> &Arc<dyn AuthStore> {
        &self.store
    }

    /// Whether the active strategy serves the token-refresh operation.
    pub fn supports_refresh(&self) -> bool {
        self.strategy.supports_refresh()
    }

    /// Body fields the active strategy populates on success responses.
    pub fn response_keys(&self) -> &'static [&'static str] {
        self.strategy.response_keys()
    }

    /// Whether endpoint responses carry a structured JSON body.
    ///
    /// A strategy whose tokens travel in the body forces JSON regardless
    /// of configuration.
    pub fn json_responses(&self) -> bool {
        self.json_responses || !self.strategy.response_keys().is_empty()
    }

    /// Per-request housekeeping; runs the throttled pruning sweep.
    ///
    /// The surrounding handler calls this once per incoming request,
    /// before any other engine query.
    pub async fn begin_request(&self) -> AuthResult<usize> {
        self.pruner
            .maybe_prune(self.store.as_ref(), self.clock.now())
            .await
    }

    /// Resolves the session the request carries, enforcing expiry lazily.
    ///
    /// An expired session is removed from the store and the strategy's
    /// clearing side effect runs before "no session" is returned, so a
    /// stale client token can never authenticate twice.
    pub async fn current_session(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Option<Session>> {
        let now = self.clock.now();
        let Some(session) = self
            .strategy
            .resolve_session(req, self.store.as_ref(), now)
            .await?
        else {
            debug!("No session");
            return Ok(None);
        };
        if session.has_expired(now) {
            debug!(token = ?session.token, "Session has expired");
            if let Some(token) = &session.token {
                self.store.remove_session(token).await?;
            }
            self.strategy.clear_session(artifacts);
            return Ok(None);
        }
        debug!(username = %session.user.username, "Found session");
        Ok(Some(session))
    }

    /// Authorizes the request against the ACL, resolving the current
    /// principal first. Lifecycle endpoint paths are exempted by the
    /// endpoint layer, not here.
    pub async fn authorize(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<bool> {
        let session = self.current_session(req, artifacts).await?;
        Ok(self
            .acl
            .authorizes(&req.method, &req.path, session.as_ref().map(|s| &s.user)))
    }

    /// Checks credentials, returning the user on a match.
    ///
    /// A missing user and a wrong password are indistinguishable to the
    /// caller; only the debug log knows why.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<Option<User>> {
        let Some(user) = self.store.find_user(username).await? else {
            debug!(username, "No such user");
            return Ok(None);
        };
        if self.scheme.verify(password, &user.password)? {
            Ok(Some(user))
        } else {
            debug!(username, "Password mismatch");
            Ok(None)
        }
    }

    /// Logs in with the request's `username`/`password` parameters.
    ///
    /// On failure any session the request carried is expired before the
    /// authentication error is returned.
    pub async fn login(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Session> {
        let username = required_param(req, "username")?;
        let password = required_param(req, "password")?;
        match self.authenticate(username, password).await? {
            Some(user) => {
                info!(username = %user.username, "Login");
                self.new_session(req, user, artifacts).await
            }
            None => {
                self.expire_current_session(req, artifacts).await?;
                Err(AuthError::authentication("Username or password is wrong"))
            }
        }
    }

    /// Expires the current session server-side and clears it client-side.
    pub async fn logout(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()> {
        self.expire_current_session(req, artifacts).await
    }

    /// Registers a new user from the request's `username`/`password`/
    /// `roles` parameters.
    ///
    /// Every requested role must be granted to the current principal; the
    /// empty role set is checked against the no-role grant. Registration
    /// does not log the new user in.
    pub async fn register(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<User> {
        let username = required_param(req, "username")?.to_string();
        let password = required_param(req, "password")?.to_string();
        let roles = split_roles(req.param("roles"));

        let session = self.current_session(req, artifacts).await?;
        let principal = session.as_ref().map(|s| &s.user);
        if !self
            .grants
            .may_grant_all(roles.iter().map(String::as_str), principal)
        {
            return Err(AuthError::authorization(
                "You cannot create a user with the requested roles",
            ));
        }
        self.new_user(&username, &password, roles, true).await
    }

    /// Re-authenticates via `username`/`password`, changes the password to
    /// `new_password`, and issues a fresh session for the user.
    pub async fn changepwd(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Session> {
        let username = required_param(req, "username")?;
        let password = required_param(req, "password")?;
        let Some(user) = self.authenticate(username, password).await? else {
            return Err(AuthError::authentication("Username or password is wrong"));
        };
        let new_password = required_param(req, "new_password")?;
        let user = self.change_password(&user.username, new_password, true).await?;
        self.new_session(req, user, artifacts).await
    }

    /// Issues a new access token against a valid refresh-token session.
    ///
    /// With rotation enabled the old refresh token is invalidated and a
    /// new one stored; otherwise the stored session is re-attached as is.
    /// A verified bearer token alone is not good enough here: the refresh
    /// operation requires the stored session.
    pub async fn refresh(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Session> {
        if !self.strategy.supports_refresh() {
            return Err(AuthError::new(
                ErrorKind::MethodNotAllowed,
                "Refresh tokens are not supported by the active session strategy",
            ));
        }
        let Some(session) = self.current_stored_session(req, artifacts).await? else {
            return Err(AuthError::authentication(
                "Missing or invalid refresh token",
            ));
        };
        if self.strategy.rotate_on_refresh() {
            self.new_session(req, session.user, artifacts).await
        } else {
            // The stored refresh token stays valid but is never echoed
            // back; only a fresh access token goes out.
            let reissue = Session::virtual_session(session.user.clone(), session.expiry);
            self.strategy
                .attach_session(&reissue, self.clock.now(), artifacts)?;
            Ok(session)
        }
    }

    /// Expires the old session (if any), then generates, stores, and
    /// attaches a fresh one for `user`.
    pub async fn new_session(
        &self,
        req: &RequestContext,
        user: User,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Session> {
        self.expire_current_session(req, artifacts).await?;
        let now = self.clock.now();
        let session = self.strategy.generate_session(user, now);
        if let Some(expiry) = session.expiry {
            debug!(token = ?session.token, %expiry, "New session expires");
        }
        self.store.add_session(session.clone()).await?;
        self.strategy.attach_session(&session, now, artifacts)?;
        Ok(session)
    }

    /// Invalidates the request's current session server-side.
    ///
    /// Stateless sessions (no stored token) have nothing to remove and are
    /// left to age out on their own.
    pub async fn expire_current_session(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()> {
        let Some(session) = self.current_session(req, artifacts).await? else {
            return Ok(());
        };
        let Some(token) = &session.token else {
            return Ok(());
        };
        debug!(token, "Expiring session");
        self.store.remove_session(token).await?;
        self.strategy.clear_session(artifacts);
        Ok(())
    }

    /// Creates a user outside the endpoint layer (seeding, bulk import).
    ///
    /// With `plaintext` set the password is policy-checked and hashed;
    /// otherwise it is stored as a pre-computed digest that must match the
    /// configured scheme.
    pub async fn new_user(
        &self,
        username: &str,
        password: &str,
        roles: Vec<String>,
        plaintext: bool,
    ) -> AuthResult<User> {
        if username.is_empty() {
            return Err(AuthError::invalid_username(username));
        }
        if self.store.find_user(username).await?.is_some() {
            return Err(AuthError::user_exists(username));
        }
        let digest = self.digest_for(username, password, plaintext)?;
        let user = self
            .store
            .create_user(username, &digest, roles.into_iter().map(Role::from).collect());
        self.store.add_user(user.clone()).await?;
        info!(username, roles = ?user.roles, "Created user");
        Ok(user)
    }

    /// Changes a user's password. No re-authentication happens here; the
    /// endpoint operation validates the current credentials first.
    pub async fn change_password(
        &self,
        username: &str,
        new_password: &str,
        plaintext: bool,
    ) -> AuthResult<User> {
        let Some(mut user) = self.store.find_user(username).await? else {
            return Err(AuthError::no_such_user(username));
        };
        user.password = self.digest_for(username, new_password, plaintext)?;
        self.store.update_user(user.clone()).await?;
        info!(username, "Changed password");
        Ok(user)
    }

    /// Bulk-imports users, one `username:password[:role1,role2]` record
    /// per line. A bad record (empty field, duplicate user, weak password)
    /// is logged and skipped; only store failures abort the load. Returns
    /// the number of users created.
    pub async fn load_users_from_reader(
        &self,
        reader: impl BufRead,
        plaintext: bool,
    ) -> AuthResult<usize> {
        let mut loaded = 0;
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() {
                continue;
            }
            let (username, password, roles) = parse_user_record(&line);
            if username.is_empty() || password.is_empty() {
                error!(lineno = lineno + 1, "Empty username or password, skipping record");
                continue;
            }
            match self.new_user(username, password, roles, plaintext).await {
                Ok(_) => loaded += 1,
                Err(e)
                    if matches!(
                        e.kind,
                        ErrorKind::UserExists
                            | ErrorKind::InvalidUsername
                            | ErrorKind::WeakPassword
                    ) =>
                {
                    error!(lineno = lineno + 1, error = %e, "Skipping user record");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(loaded)
    }

    /// Bulk-imports users from a file, per
    /// [`load_users_from_reader`](Self::load_users_from_reader).
    pub async fn load_users_from_file(
        &self,
        path: impl AsRef<Path>,
        plaintext: bool,
    ) -> AuthResult<usize> {
        let file = std::fs::File::open(path)?;
        self.load_users_from_reader(std::io::BufReader::new(file), plaintext)
            .await
    }

    /// Resolves the stored session the request's carried token points at,
    /// with the same lazy expiry handling as `current_session` but without
    /// any stateless fallback.
    async fn current_stored_session(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Option<Session>> {
        let Some(token) = self.strategy.current_token(req) else {
            return Ok(None);
        };
        let Some(session) = self.store.find_session(&token).await? else {
            return Ok(None);
        };
        if session.has_expired(self.clock.now()) {
            debug!(token, "Session has expired");
            self.store.remove_session(&token).await?;
            self.strategy.clear_session(artifacts);
            return Ok(None);
        }
        Ok(Some(session))
    }

    fn digest_for(&self, username: &str, password: &str, plaintext: bool) -> AuthResult<String> {
        if !plaintext {
            return Ok(password.to_string());
        }
        if !self.policy.is_strong(password) {
            return Err(AuthError::weak_password(username));
        }
        self.scheme.transform(password)
    }
}

/// Extracts a required, non-empty request parameter.
pub(crate) fn required_param<'a>(req: &'a RequestContext, name: &str) -> AuthResult<&'a str> {
    req.param(name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::endpoint_args(format!("Missing required parameter: {name}")))
}

/// Splits a comma-joined roles parameter, trimming and dropping empties.
fn split_roles(param: Option<&str>) -> Vec<String> {
    param
        .map(|roles| {
            roles
                .split(',')
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Splits a bulk-import record into username, password, and roles.
/// Fields beyond the third are ignored.
fn parse_user_record(line: &str) -> (&str, &str, Vec<String>) {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = line.split(':');
    let username = fields.next().unwrap_or("");
    let password = fields.next().unwrap_or("");
    let roles = split_roles(fields.next());
    (username, password, roles)
}
