//! Integration tests for the JWT session strategy.

use std::sync::Arc;

use chrono::Duration;

use warden_core::config::AuthConfig;
use warden_core::traits::Clock;
use warden_engine::{JwtDecoder, JwtKeys, RequestContext, SessionArtifacts};
use warden_store::AuthStore;

use crate::helpers::{TEST_PASSPHRASE, TestApp, body_str};

fn decoder() -> JwtDecoder {
    JwtDecoder::new(Arc::new(
        JwtKeys::symmetric("HS256", TEST_PASSPHRASE).unwrap(),
    ))
}

#[tokio::test]
async fn test_login_issues_access_and_refresh_tokens() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let now = app.clock.now();
    let response = app.login("alice", "Str0ng!Pass").await;
    assert!(response.is_success());

    let access = body_str(&response, "access_token").unwrap();
    let claims = decoder().decode(access).unwrap();
    assert_eq!(claims.sub, "alice");
    assert_eq!(claims.exp, (now + Duration::minutes(15)).timestamp());
    assert_eq!(claims.iat, now.timestamp());

    let refresh = body_str(&response, "refresh_token").unwrap();
    assert_eq!(refresh.len(), 100);
    let session = app.store.find_session(refresh).await.unwrap().unwrap();
    assert_eq!(session.expiry, Some(now + Duration::minutes(1440)));
}

#[tokio::test]
async fn test_bearer_token_authenticates_ordinary_requests() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let response = app.login("alice", "Str0ng!Pass").await;
    let access = body_str(&response, "access_token").unwrap().to_string();

    let req = RequestContext::new("GET", "/anything").with_bearer(access);
    let mut artifacts = SessionArtifacts::new();
    let session = app
        .engine
        .current_session(&req, &mut artifacts)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.user.username, "alice");
    // Stateless: nothing was looked up or stored for it.
    assert!(session.token.is_none());
}

#[tokio::test]
async fn test_refresh_rotates_and_invalidates_old_token() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let login = app.login("alice", "Str0ng!Pass").await;
    let old_refresh = body_str(&login, "refresh_token").unwrap().to_string();

    let refreshed = app
        .handle(
            &RequestContext::new("POST", "/authtoken")
                .with_param("refresh_token", old_refresh.clone()),
        )
        .await;
    assert!(refreshed.is_success());
    assert!(body_str(&refreshed, "access_token").is_some());

    let new_refresh = body_str(&refreshed, "refresh_token").unwrap();
    assert_ne!(new_refresh, old_refresh);
    assert!(app.store.find_session(&old_refresh).await.unwrap().is_none());

    // The old refresh token is now rejected.
    let rejected = app
        .handle(
            &RequestContext::new("POST", "/authtoken").with_param("refresh_token", old_refresh),
        )
        .await;
    assert_eq!(rejected.status, 401);
}

#[tokio::test]
async fn test_refresh_without_rotation_keeps_stored_token() {
    let mut config = AuthConfig::default();
    config.jwt.rotate_refresh_tokens = false;
    let app = TestApp::jwt(config);
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let login = app.login("alice", "Str0ng!Pass").await;
    let refresh = body_str(&login, "refresh_token").unwrap().to_string();

    let refreshed = app
        .handle(
            &RequestContext::new("POST", "/authtoken")
                .with_param("refresh_token", refresh.clone()),
        )
        .await;
    assert!(refreshed.is_success());
    assert!(body_str(&refreshed, "access_token").is_some());
    // The stored token stays valid but is not echoed back.
    assert_eq!(body_str(&refreshed, "refresh_token"), None);
    assert_eq!(
        refreshed.body.as_ref().unwrap().get("refresh_token"),
        Some(&serde_json::Value::Null)
    );
    assert!(app.store.find_session(&refresh).await.unwrap().is_some());

    // The same token keeps working on a later refresh.
    let again = app
        .handle(&RequestContext::new("POST", "/authtoken").with_param("refresh_token", refresh))
        .await;
    assert!(again.is_success());
}

#[tokio::test]
async fn test_refresh_with_invalid_token_is_401() {
    let app = TestApp::jwt(AuthConfig::default());
    let response = app
        .handle(
            &RequestContext::new("POST", "/authtoken").with_param("refresh_token", "bogus"),
        )
        .await;
    assert_eq!(response.status, 401);
    assert!(response.error().is_some());
}

#[tokio::test]
async fn test_expired_refresh_token_is_rejected() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let login = app.login("alice", "Str0ng!Pass").await;
    let refresh = body_str(&login, "refresh_token").unwrap().to_string();

    app.clock.advance(Duration::minutes(1441));
    let response = app
        .handle(&RequestContext::new("POST", "/authtoken").with_param("refresh_token", refresh))
        .await;
    assert_eq!(response.status, 401);
}

#[tokio::test]
async fn test_logout_removes_refresh_session() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let login = app.login("alice", "Str0ng!Pass").await;
    let refresh = body_str(&login, "refresh_token").unwrap().to_string();
    assert_eq!(app.store.session_count(), 1);

    let response = app
        .handle(&RequestContext::new("POST", "/logout").with_param("refresh_token", refresh))
        .await;
    assert!(response.is_success());
    assert_eq!(app.store.session_count(), 0);
}

#[tokio::test]
async fn test_logout_with_only_bearer_is_a_noop() {
    let app = TestApp::jwt(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let login = app.login("alice", "Str0ng!Pass").await;
    let access = body_str(&login, "access_token").unwrap().to_string();
    assert_eq!(app.store.session_count(), 1);

    // Nothing is stored for the access token, so nothing is removed.
    let response = app
        .handle(&RequestContext::new("POST", "/logout").with_bearer(access))
        .await;
    assert!(response.is_success());
    assert_eq!(app.store.session_count(), 1);
}
