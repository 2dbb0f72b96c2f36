//! Shared test helpers for integration tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use warden_core::config::AuthConfig;
use warden_core::traits::Clock;
use warden_engine::{
    AclPolicy, AuthEngine, AuthResponse, CookieStrategy, JwtKeys, JwtStrategy, RequestContext,
    SessionArtifacts,
};
use warden_store::MemoryStore;

pub const TEST_PASSPHRASE: &str = "integration-test-secret";

/// A manually advanced clock.
pub struct TestClock {
    now: Mutex<DateTime<Utc>>,
}

impl TestClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(Utc::now()),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// Test engine context.
pub struct TestApp {
    pub engine: AuthEngine,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<TestClock>,
}

impl TestApp {
    /// An engine over the cookie strategy, JSON responses, open ACL.
    pub fn cookie(mut config: AuthConfig) -> Self {
        config.response.json = true;
        let strategy = Arc::new(CookieStrategy::new(config.cookie.clone()));
        Self::build(config, strategy, AclPolicy::open())
    }

    /// An engine over the cookie strategy with the given ACL.
    pub fn cookie_with_acl(mut config: AuthConfig, acl: AclPolicy) -> Self {
        config.response.json = true;
        let strategy = Arc::new(CookieStrategy::new(config.cookie.clone()));
        Self::build(config, strategy, acl)
    }

    /// An engine over the JWT strategy with a symmetric test key.
    pub fn jwt(config: AuthConfig) -> Self {
        let keys = Arc::new(JwtKeys::symmetric("HS256", TEST_PASSPHRASE).unwrap());
        let strategy = Arc::new(JwtStrategy::new(&config.jwt, keys));
        Self::build(config, strategy, AclPolicy::open())
    }

    fn build(
        config: AuthConfig,
        strategy: Arc<dyn warden_engine::SessionStrategy>,
        acl: AclPolicy,
    ) -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = TestClock::new();
        let engine = AuthEngine::builder(config, store.clone(), strategy)
            .acl(acl)
            .clock(clock.clone())
            .build()
            .unwrap();
        Self {
            engine,
            store,
            clock,
        }
    }

    /// Runs a request through the full pipeline, expecting it to be
    /// handled (a lifecycle endpoint or a denial).
    pub async fn handle(&self, req: &RequestContext) -> AuthResponse {
        let mut artifacts = SessionArtifacts::new();
        self.engine
            .handle_request(req, &mut artifacts)
            .await
            .unwrap()
            .expect("request should have been handled")
    }

    /// Registers a user directly, bypassing the endpoint layer.
    pub async fn seed_user(&self, username: &str, password: &str, roles: &[&str]) {
        self.engine
            .new_user(
                username,
                password,
                roles.iter().map(|r| r.to_string()).collect(),
                true,
            )
            .await
            .unwrap();
    }

    /// Logs in through the endpoint and returns the response.
    pub async fn login(&self, username: &str, password: &str) -> AuthResponse {
        self.handle(
            &RequestContext::new("POST", "/login")
                .with_param("username", username)
                .with_param("password", password),
        )
        .await
    }
}

/// Extracts the session token from a `Set-Cookie` response header.
pub fn session_cookie(response: &AuthResponse) -> Option<String> {
    let value = response
        .headers
        .iter()
        .find(|(name, _)| name == "Set-Cookie")
        .map(|(_, value)| value.as_str())?;
    let token = value.strip_prefix("SESSION=")?.split(';').next()?;
    Some(token.to_string())
}

/// Extracts a string field from a JSON response body.
pub fn body_str<'a>(response: &'a AuthResponse, key: &str) -> Option<&'a str> {
    response.body.as_ref()?.get(key)?.as_str()
}
