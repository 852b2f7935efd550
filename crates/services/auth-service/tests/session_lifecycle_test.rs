//! Session lifecycle against the in-memory store and a manual clock.

mod support;

use chrono::Duration;

use auth_service_lib::service::{SessionService, SessionSettings};
use common::AppError;
use domain::{SESSION_KEY_LENGTH, SESSION_TTL_SECONDS};
use support::TestApp;

#[tokio::test]
async fn test_created_session_resolves_to_its_account() {
    let app = TestApp::new();

    let token = app.sessions.create_session(7).await.unwrap();

    assert_eq!(token.len(), SESSION_KEY_LENGTH);
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(app.sessions.get_account_id(&token).await.unwrap(), 7);

    let stored = app.sessions_store.get(&token).unwrap();
    assert_eq!(stored.last_used, app.now());
    assert_eq!(stored.expires_at, app.now() + Duration::seconds(SESSION_TTL_SECONDS));
}

#[tokio::test]
async fn test_tokens_are_unique() {
    let app = TestApp::new();

    let first = app.sessions.create_session(1).await.unwrap();
    let second = app.sessions.create_session(1).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(app.sessions.get_account_id(&first).await.unwrap(), 1);
    assert_eq!(app.sessions.get_account_id(&second).await.unwrap(), 1);
}

#[tokio::test]
async fn test_unknown_token_is_not_found() {
    let app = TestApp::new();

    let result = app.sessions.get_account_id("does-not-exist").await;

    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_session_stops_resolving_at_expiry() {
    let app = TestApp::new();
    let token = app.sessions.create_session(3).await.unwrap();

    app.advance(Duration::seconds(SESSION_TTL_SECONDS - 1));
    assert_eq!(app.sessions.get_account_id(&token).await.unwrap(), 3);

    app.advance(Duration::seconds(1));
    let result = app.sessions.get_account_id(&token).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_lookup_refreshes_last_used() {
    let app = TestApp::new();
    let token = app.sessions.create_session(3).await.unwrap();

    app.advance(Duration::hours(5));
    app.sessions.get_account_id(&token).await.unwrap();

    assert_eq!(app.sessions_store.get(&token).unwrap().last_used, app.now());
}

#[tokio::test]
async fn test_lookup_leaves_last_used_when_tracking_disabled() {
    let app = TestApp::with_settings(SessionSettings {
        track_last_used: false,
        ..SessionSettings::default()
    });
    let token = app.sessions.create_session(3).await.unwrap();
    let created = app.now();

    app.advance(Duration::hours(5));
    app.sessions.get_account_id(&token).await.unwrap();

    assert_eq!(app.sessions_store.get(&token).unwrap().last_used, created);
}

#[tokio::test]
async fn test_delete_session_is_soft_and_single_use() {
    let app = TestApp::new();
    let token = app.sessions.create_session(9).await.unwrap();

    app.sessions.delete_session(&token).await.unwrap();

    // Row stays until a sweep, with expiry moved to the logout instant
    let stored = app.sessions_store.get(&token).unwrap();
    assert_eq!(stored.expires_at, app.now());

    assert!(matches!(
        app.sessions.get_account_id(&token).await,
        Err(AppError::NotFound)
    ));
    assert!(matches!(
        app.sessions.delete_session(&token).await,
        Err(AppError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_leaves_other_sessions_alone() {
    let app = TestApp::new();
    let phone = app.sessions.create_session(9).await.unwrap();
    let laptop = app.sessions.create_session(9).await.unwrap();

    app.sessions.delete_session(&phone).await.unwrap();

    assert_eq!(app.sessions.get_account_id(&laptop).await.unwrap(), 9);
}

#[tokio::test]
async fn test_expired_sweep_removes_only_expired_rows() {
    let app = TestApp::new();
    let stale = app.sessions.create_session(1).await.unwrap();
    let logged_out = app.sessions.create_session(2).await.unwrap();
    app.sessions.delete_session(&logged_out).await.unwrap();

    app.advance(Duration::days(1));
    let fresh = app.sessions.create_session(3).await.unwrap();
    app.sessions_store
        .set_expires_at(&stale, app.now() - Duration::seconds(1));

    let removed = app.sessions.hard_delete_expired_sessions().await.unwrap();

    assert_eq!(removed, 2);
    assert!(app.sessions_store.get(&stale).is_none());
    assert!(app.sessions_store.get(&logged_out).is_none());
    assert_eq!(app.sessions.get_account_id(&fresh).await.unwrap(), 3);
}

#[tokio::test]
async fn test_expired_sweep_on_empty_store() {
    let app = TestApp::new();

    assert_eq!(app.sessions.hard_delete_expired_sessions().await.unwrap(), 0);
}

#[tokio::test]
async fn test_inactive_sweep_uses_session_lifetime() {
    let app = TestApp::new();
    let idle = app.sessions.create_session(1).await.unwrap();
    let recent = app.sessions.create_session(2).await.unwrap();

    app.sessions_store.set_last_used(
        &idle,
        app.now() - Duration::seconds(SESSION_TTL_SECONDS + 60),
    );
    app.sessions_store
        .set_last_used(&recent, app.now() - Duration::days(30));

    let removed = app.sessions.hard_delete_inactive_sessions().await.unwrap();

    assert_eq!(removed, 1);
    assert!(app.sessions_store.get(&idle).is_none());
    assert!(app.sessions_store.get(&recent).is_some());
}

#[tokio::test]
async fn test_idle_sweep_window_has_a_floor() {
    let app = TestApp::new();
    let three_days = app.sessions.create_session(1).await.unwrap();
    let eight_days = app.sessions.create_session(2).await.unwrap();

    app.sessions_store
        .set_last_used(&three_days, app.now() - Duration::days(3));
    app.sessions_store
        .set_last_used(&eight_days, app.now() - Duration::days(8));

    // One day is raised to the seven-day minimum
    let removed = app
        .sessions
        .hard_delete_idle_sessions(Duration::days(1))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(app.sessions_store.get(&three_days).is_some());
    assert!(app.sessions_store.get(&eight_days).is_none());
}

#[tokio::test]
async fn test_idle_sweep_past_calendar_is_rejected() {
    let app = TestApp::new();
    let token = app.sessions.create_session(3).await.unwrap();

    let result = app
        .sessions
        .hard_delete_idle_sessions(Duration::days(1_000_000_000))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
    assert!(app.sessions_store.get(&token).is_some());
}

#[tokio::test]
async fn test_used_session_survives_idle_sweep() {
    let app = TestApp::new();
    let token = app.sessions.create_session(4).await.unwrap();

    app.advance(Duration::days(20));
    app.sessions.get_account_id(&token).await.unwrap();

    let removed = app
        .sessions
        .hard_delete_idle_sessions(Duration::days(10))
        .await
        .unwrap();

    assert_eq!(removed, 0);
    assert_eq!(app.sessions.get_account_id(&token).await.unwrap(), 4);
}

#[tokio::test]
async fn test_list_sessions_newest_first_and_live_only() {
    let app = TestApp::new();
    let oldest = app.sessions.create_session(5).await.unwrap();
    app.advance(Duration::minutes(1));
    let ended = app.sessions.create_session(5).await.unwrap();
    app.advance(Duration::minutes(1));
    let newest = app.sessions.create_session(5).await.unwrap();
    app.sessions.create_session(6).await.unwrap();

    app.sessions.delete_session(&ended).await.unwrap();

    let keys: Vec<String> = app
        .sessions
        .list_sessions(5)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.session_key)
        .collect();

    assert_eq!(keys, vec![newest, oldest]);
}
