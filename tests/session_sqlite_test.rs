//! Full lifecycle over the SQLite store
//!
//! The other suites run against the in-memory store; this one walks the
//! whole signup -> verify -> login -> refresh -> logout path against
//! SQLite to keep the two backends honest about the same contract.

mod common;

use std::sync::Arc;

use common::MockNotifier;
use eventhub_auth::{
    AuthError, JwtConfig, NewUser, SessionManager, SqliteUserStore, TokenService, UserStore,
};

#[test]
fn test_full_lifecycle_on_sqlite() {
    let store = Arc::new(SqliteUserStore::open_in_memory().unwrap());
    let notifier = MockNotifier::new();
    let manager = SessionManager::new(
        store.clone(),
        TokenService::new(&JwtConfig::with_secret("test-secret")),
        notifier.clone(),
        "http://localhost:3000",
    );

    let ack = manager
        .signup(&NewUser {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password: "password123".to_string(),
        })
        .unwrap();
    assert_eq!(
        ack.message,
        "User created successfully, please verify your email"
    );

    // Login is forbidden until the email is verified
    let err = manager
        .authenticate("john@example.com", "password123")
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailNotVerified));

    let token = notifier.verification_token("john@example.com").unwrap();
    manager.verify_email(&token).unwrap();

    let tokens = manager
        .authenticate("john@example.com", "password123")
        .unwrap();

    // Rotation works and replay is caught
    let rotated = manager.refresh(&tokens.refresh_token).unwrap();
    assert!(matches!(
        manager.refresh(&tokens.refresh_token).unwrap_err(),
        AuthError::InvalidRefreshToken
    ));

    // Logout kills the rotated token too
    let id = store.find_by_email("john@example.com").unwrap().unwrap().id;
    manager.logout(id).unwrap();
    assert!(matches!(
        manager.refresh(&rotated.refresh_token).unwrap_err(),
        AuthError::NoActiveSession
    ));

    let profile = manager.get_profile(id).unwrap();
    assert_eq!(profile.name, "John Doe");
    assert!(profile.is_email_verified);
}
