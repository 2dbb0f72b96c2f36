//! Integration tests for the cookie session strategy.

use chrono::Duration;

use warden_core::config::AuthConfig;
use warden_engine::{RequestContext, SessionArtifacts};

use crate::helpers::{TestApp, session_cookie};

#[tokio::test]
async fn test_login_sets_twenty_char_hex_cookie() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let response = app.login("alice", "Str0ng!Pass").await;
    assert!(response.is_success());

    let token = session_cookie(&response).unwrap();
    assert_eq!(token.len(), 20);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_cookie_resolves_to_user_on_next_request() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let token = session_cookie(&app.login("alice", "Str0ng!Pass").await).unwrap();

    let req = RequestContext::new("GET", "/anything").with_cookie("SESSION", token);
    let mut artifacts = SessionArtifacts::new();
    let session = app
        .engine
        .current_session(&req, &mut artifacts)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.user.username, "alice");
}

#[tokio::test]
async fn test_logout_clears_cookie_and_store() {
    let app = TestApp::cookie(AuthConfig::default());
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let token = session_cookie(&app.login("alice", "Str0ng!Pass").await).unwrap();
    assert_eq!(app.store.session_count(), 1);

    let response = app
        .handle(&RequestContext::new("GET", "/logout").with_cookie("SESSION", token.clone()))
        .await;
    assert!(response.is_success());
    assert_eq!(session_cookie(&response).as_deref(), Some(""));
    assert_eq!(app.store.session_count(), 0);

    // The cleared token no longer resolves.
    let req = RequestContext::new("GET", "/anything").with_cookie("SESSION", token);
    let mut artifacts = SessionArtifacts::new();
    assert!(
        app.engine
            .current_session(&req, &mut artifacts)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_expired_session_is_removed_lazily_and_idempotently() {
    let mut config = AuthConfig::default();
    config.cookie.lifetime_secs = Some(60);
    // Disable sweeping so only the lazy path runs.
    config.session.prune_every_secs = None;
    let app = TestApp::cookie(config);
    app.seed_user("alice", "Str0ng!Pass", &[]).await;

    let token = session_cookie(&app.login("alice", "Str0ng!Pass").await).unwrap();
    app.clock.advance(Duration::seconds(61));

    let req = RequestContext::new("GET", "/anything").with_cookie("SESSION", token);
    let mut artifacts = SessionArtifacts::new();
    assert!(
        app.engine
            .current_session(&req, &mut artifacts)
            .await
            .unwrap()
            .is_none()
    );
    // Expiry ran the clearing side effect and removed the record.
    assert!(artifacts.header("Set-Cookie").unwrap().starts_with("SESSION=;"));
    assert_eq!(app.store.session_count(), 0);

    // Repeated access after removal is "no session", not an error.
    let mut artifacts = SessionArtifacts::new();
    assert!(
        app.engine
            .current_session(&req, &mut artifacts)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_prune_sweeps_expired_sessions_per_request() {
    let mut config = AuthConfig::default();
    config.cookie.lifetime_secs = Some(60);
    let app = TestApp::cookie(config);
    app.seed_user("alice", "Str0ng!Pass", &[]).await;
    app.seed_user("bob", "An0ther!Pass", &[]).await;

    app.login("alice", "Str0ng!Pass").await;
    app.clock.advance(Duration::seconds(30));
    app.login("bob", "An0ther!Pass").await;
    assert_eq!(app.store.session_count(), 2);

    // Alice's session ages out; a request without any cookie sweeps it.
    app.clock.advance(Duration::seconds(31));
    let mut artifacts = SessionArtifacts::new();
    app.engine
        .handle_request(&RequestContext::new("GET", "/anything"), &mut artifacts)
        .await
        .unwrap();
    assert_eq!(app.store.session_count(), 1);
}
