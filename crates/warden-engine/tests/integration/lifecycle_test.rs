//! Integration tests for the account lifecycle endpoints.

use warden_core::config::AuthConfig;
use warden_engine::{RequestContext, RoleGrants};
use warden_store::AuthStore;

use crate::helpers::{TestApp, body_str, session_cookie};

#[tokio::test]
async fn test_register_then_duplicate() {
    let app = TestApp::cookie(AuthConfig::default());

    let req = RequestContext::new("POST", "/register")
        .with_param("username", "alice")
        .with_param("password", "Str0ng!Pass");
    let response = app.handle(&req).await;
    assert!(response.is_success());
    assert!(app.store.find_user("alice").await.unwrap().is_some());

    let response = app.handle(&req).await;
    assert_eq!(response.status, 400);
    assert_eq!(response.error(), Some("User alice already exists"));
}

#[tokio::test]
async fn test_register_weak_password_is_400() {
    let app = TestApp::cookie(AuthConfig::default());
    let response = app
        .handle(
            &RequestContext::new("POST", "/register")
                .with_param("username", "alice")
                .with_param("password", "weak"),
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(app.store.find_user("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn test_register_does_not_log_in() {
    let app = TestApp::cookie(AuthConfig::default());
    let response = app
        .handle(
            &RequestContext::new("POST", "/register")
                .with_param("username", "alice")
                .with_param("password", "Str0ng!Pass"),
        )
        .await;
    assert!(response.is_success());
    assert!(session_cookie(&response).is_none());
    assert_eq!(app.store.session_count(), 0);
}

#[tokio::test]
async fn test_register_roles_param_is_comma_joined() {
    let app = TestApp::cookie(AuthConfig::default());
    // The default grants only govern the no-role key; named roles are
    // unlisted and therefore open.
    let response = app
        .handle(
            &RequestContext::new("POST", "/register")
                .with_param("username", "ops")
                .with_param("password", "Str0ng!Pass")
                .with_param("roles", "admin, service"),
        )
        .await;
    assert!(response.is_success());
    let user = app.store.find_user("ops").await.unwrap().unwrap();
    assert!(user.has_role("admin"));
    assert!(user.has_role("service"));
}

#[tokio::test]
async fn test_wrong_password_login_creates_no_session() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let response = app.login("alice", "wrong").await;
    assert_eq!(response.status, 401);
    assert_eq!(response.error(), Some("Username or password is wrong"));
    assert_eq!(app.store.session_count(), 0);
}

#[tokio::test]
async fn test_changepwd_requires_current_credentials() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let response = app
        .handle(
            &RequestContext::new("POST", "/changepwd")
                .with_param("username", "alice")
                .with_param("password", "wrong")
                .with_param("new_password", "N3w!Password"),
        )
        .await;
    assert_eq!(response.status, 401);

    // The password is unchanged.
    assert!(app.login("alice", "Str0ng!Pass").await.is_success());
}

#[tokio::test]
async fn test_changepwd_rotates_password_and_session() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;
    let old_token = session_cookie(&app.login("alice", "Str0ng!Pass").await).unwrap();

    let response = app
        .handle(
            &RequestContext::new("POST", "/changepwd")
                .with_param("username", "alice")
                .with_param("password", "Str0ng!Pass")
                .with_param("new_password", "N3w!Password")
                .with_cookie("SESSION", old_token.clone()),
        )
        .await;
    assert!(response.is_success());

    // A fresh session was issued and the old one expired.
    let new_token = session_cookie(&response).unwrap();
    assert_ne!(new_token, old_token);
    assert!(app.store.find_session(&old_token).await.unwrap().is_none());
    assert!(app.store.find_session(&new_token).await.unwrap().is_some());

    assert_eq!(app.login("alice", "Str0ng!Pass").await.status, 401);
    assert!(app.login("alice", "N3w!Password").await.is_success());
}

#[tokio::test]
async fn test_changepwd_weak_new_password_is_400() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let response = app
        .handle(
            &RequestContext::new("POST", "/changepwd")
                .with_param("username", "alice")
                .with_param("password", "Str0ng!Pass")
                .with_param("new_password", "weak"),
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(app.login("alice", "Str0ng!Pass").await.is_success());
}

#[tokio::test]
async fn test_role_grants_enforced_through_register_endpoint() {
    let mut app = TestApp::cookie(AuthConfig::default());
    app.engine = rebuild_with_grants(&app);
    app.seed_user("root", "Sup3r!Secret", &["admin"]).await;

    // Anonymous registration of a privileged role is denied.
    let response = app
        .handle(
            &RequestContext::new("POST", "/register")
                .with_param("username", "mallory")
                .with_param("password", "Str0ng!Pass")
                .with_param("roles", "service"),
        )
        .await;
    assert_eq!(response.status, 401);

    // An admin session may grant it.
    let token = session_cookie(&app.login("root", "Sup3r!Secret").await).unwrap();
    let response = app
        .handle(
            &RequestContext::new("POST", "/register")
                .with_param("username", "deploy")
                .with_param("password", "Str0ng!Pass")
                .with_param("roles", "service")
                .with_cookie("SESSION", token),
        )
        .await;
    assert!(response.is_success());
    assert!(
        app.store
            .find_user("deploy")
            .await
            .unwrap()
            .unwrap()
            .has_role("service")
    );
}

fn rebuild_with_grants(app: &TestApp) -> warden_engine::AuthEngine {
    use std::sync::Arc;
    use warden_engine::CookieStrategy;

    let mut config = AuthConfig::default();
    config.response.json = true;
    warden_engine::AuthEngine::builder(
        config.clone(),
        app.store.clone(),
        Arc::new(CookieStrategy::new(config.cookie)),
    )
    .grants(RoleGrants::new([
        (None, vec![""]),
        (Some("service"), vec!["#admin"]),
    ]))
    .clock(app.clock.clone())
    .build()
    .unwrap()
}

#[tokio::test]
async fn test_json_error_key_is_always_present() {
    let app = TestApp::cookie(AuthConfig::default());
    let success = app.handle(&RequestContext::new("GET", "/logout")).await;
    let body = success.body.unwrap();
    assert!(body.get("error").unwrap().is_null());

    let failure = app.handle(&RequestContext::new("POST", "/login")).await;
    assert_eq!(failure.status, 404);
    assert!(failure.body.unwrap().get("error").unwrap().is_string());
}
