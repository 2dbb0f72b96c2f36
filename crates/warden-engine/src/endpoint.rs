//! Lifecycle endpoint dispatch and response shaping.
//!
//! The surrounding request handler turns each request into a
//! [`RequestContext`] and calls [`AuthEngine::handle_request`]: recognized
//! lifecycle paths are dispatched here, everything else is authorized
//! against the ACL and handed back for the application to serve.

use std::mem;

use serde_json::{Map, Value};
use tracing::debug;

use warden_core::error::AuthError;
use warden_core::result::AuthResult;

use crate::request::{RequestContext, SessionArtifacts};
use crate::session::AuthEngine;

/// A recognized lifecycle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    Logout,
    ChangePwd,
    AuthToken,
}

impl Endpoint {
    /// Recognizes a request path as a lifecycle endpoint.
    ///
    /// `/authtoken` only exists under a strategy that issues refresh
    /// tokens; otherwise it is an ordinary resource path.
    pub fn recognize(path: &str, supports_refresh: bool) -> Option<Self> {
        match path {
            "/register" => Some(Self::Register),
            "/login" => Some(Self::Login),
            "/logout" => Some(Self::Logout),
            "/changepwd" => Some(Self::ChangePwd),
            "/authtoken" if supports_refresh => Some(Self::AuthToken),
            _ => None,
        }
    }

    /// Whether the endpoint is reachable without passing the resource ACL.
    /// Login carries its own credential check; logout and refresh operate
    /// on tokens the caller already holds.
    pub fn bypasses_acl(self) -> bool {
        matches!(self, Self::Login | Self::Logout | Self::AuthToken)
    }
}

/// The finished response to a lifecycle endpoint or an ACL denial.
#[derive(Debug, Clone)]
pub struct AuthResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers to emit, in order.
    pub headers: Vec<(String, String)>,
    /// Structured JSON body, when JSON responses are selected.
    pub body: Option<Value>,
}

impl AuthResponse {
    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// The `error` body field, when present and non-null.
    pub fn error(&self) -> Option<&str> {
        self.body.as_ref()?.get("error")?.as_str()
    }
}

impl AuthEngine {
    /// The per-request pipeline.
    ///
    /// Runs the pruning gate, dispatches recognized lifecycle endpoints,
    /// and authorizes everything else against the ACL. Returns the
    /// finished response for endpoints and denials; `None` means the
    /// request is an authorized resource request the caller serves itself,
    /// with any accumulated `artifacts` (e.g. a clearing header for a
    /// session that lazily expired) applied to its own response.
    pub async fn handle_request(
        &self,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<Option<AuthResponse>> {
        self.begin_request().await?;
        if let Some(endpoint) = Endpoint::recognize(&req.path, self.supports_refresh()) {
            debug!(?endpoint, method = %req.method, "Dispatching lifecycle endpoint");
            return Ok(Some(self.handle_endpoint(endpoint, req, artifacts).await));
        }
        if !self.authorize(req, artifacts).await? {
            return Ok(Some(self.shape_response(
                artifacts,
                Some(AuthError::authorization("Unauthorized")),
            )));
        }
        Ok(None)
    }

    /// Runs one lifecycle endpoint and shapes the response.
    ///
    /// Every business failure is translated to its status code here;
    /// nothing propagates to the caller as an error.
    pub async fn handle_endpoint(
        &self,
        endpoint: Endpoint,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResponse {
        let error = self.run_endpoint(endpoint, req, artifacts).await.err();
        self.shape_response(artifacts, error)
    }

    async fn run_endpoint(
        &self,
        endpoint: Endpoint,
        req: &RequestContext,
        artifacts: &mut SessionArtifacts,
    ) -> AuthResult<()> {
        if !matches!(req.method.as_str(), "GET" | "POST") {
            return Err(AuthError::method_not_allowed(&req.method));
        }
        if !endpoint.bypasses_acl() && !self.authorize(req, artifacts).await? {
            return Err(AuthError::authorization("Unauthorized"));
        }
        match endpoint {
            Endpoint::Register => {
                self.register(req, artifacts).await?;
            }
            Endpoint::Login => {
                self.login(req, artifacts).await?;
            }
            Endpoint::Logout => self.logout(req, artifacts).await?,
            Endpoint::ChangePwd => {
                self.changepwd(req, artifacts).await?;
            }
            Endpoint::AuthToken => {
                self.refresh(req, artifacts).await?;
            }
        }
        Ok(())
    }

    /// Folds accumulated artifacts and an optional failure into the final
    /// response.
    ///
    /// In JSON mode the body carries a fixed key set: every strategy key
    /// (null unless populated) plus `error` (null on success). In plain
    /// mode only the status and headers are meaningful.
    fn shape_response(
        &self,
        artifacts: &mut SessionArtifacts,
        error: Option<AuthError>,
    ) -> AuthResponse {
        let artifacts = mem::take(artifacts);
        let status = error.as_ref().map_or(200, |e| e.kind.http_status());
        let body = if self.json_responses() {
            let mut body = Map::new();
            for key in self.response_keys() {
                body.insert(key.to_string(), Value::Null);
            }
            body.insert("error".to_string(), Value::Null);
            for (key, value) in artifacts.params {
                body.insert(key, value);
            }
            if let Some(error) = &error {
                body.insert("error".to_string(), Value::from(error.message.clone()));
            }
            Some(Value::Object(body))
        } else {
            None
        };
        AuthResponse {
            status,
            headers: artifacts.headers,
            body,
        }
    }
}
