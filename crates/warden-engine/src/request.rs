//! Transport-neutral request and response surfaces.
//!
//! The engine never touches a real HTTP stack. The surrounding handler
//! distills each incoming request into a [`RequestContext`] and applies
//! the [`SessionArtifacts`] the engine hands back (response headers plus
//! body fields) to whatever transport it serves.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// The slice of an incoming request the engine needs.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Request method, uppercase (`GET`, `POST`, ...).
    pub method: String,
    /// Request path, without query string.
    pub path: String,
    /// Decoded request parameters (query string or form body).
    pub params: HashMap<String, String>,
    /// Cookies sent by the client, by name.
    pub cookies: HashMap<String, String>,
    /// Bearer token from the `Authorization` header, if any.
    pub bearer: Option<String>,
}

impl RequestContext {
    /// Creates a context for the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Adds a request parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Adds a cookie.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Sets the bearer token.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Looks up a request parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Looks up a cookie by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }
}

/// Session-carrying output accumulated while handling a request.
///
/// Strategies write here instead of into a response object: the cookie
/// strategy appends `Set-Cookie` headers, the token strategy adds body
/// fields such as `access_token`. The endpoint layer folds the artifacts
/// into the final [`AuthResponse`](crate::endpoint::AuthResponse).
#[derive(Debug, Clone, Default)]
pub struct SessionArtifacts {
    /// Response headers to emit, in order.
    pub headers: Vec<(String, String)>,
    /// Fields to merge into a structured response body.
    pub params: Map<String, Value>,
}

impl SessionArtifacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a response header.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    /// Sets a body field.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.params.insert(name.into(), value.into());
    }

    /// Looks up a body field.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Returns the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
