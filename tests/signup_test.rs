//! Tests for registration and the verification email

mod common;

use common::{create_manager, registration};
use eventhub_auth::{AuthError, ErrorKind, UserStore};

/// Test: signup acknowledges without issuing tokens
#[test]
fn test_signup_acknowledgment() {
    let (manager, store, notifier) = create_manager();

    let ack = manager
        .signup(&registration(
            "John Doe",
            "john@example.com",
            "password123",
        ))
        .unwrap();

    assert!(ack.status);
    assert_eq!(
        ack.message,
        "User created successfully, please verify your email"
    );

    // No session was opened
    let user = store.find_by_email("john@example.com").unwrap().unwrap();
    assert!(!user.is_email_verified);
    assert_eq!(user.refresh_token_hash, None);

    // A verification email went out
    assert!(notifier.verification_token("john@example.com").is_some());
}

/// Test: the submitted plaintext password is never stored
#[test]
fn test_password_is_never_stored_in_plaintext() {
    let (manager, store, _) = create_manager();

    manager
        .signup(&registration("John Doe", "hash@example.com", "password123"))
        .unwrap();

    let user = store.find_by_email("hash@example.com").unwrap().unwrap();
    assert_ne!(user.password_hash, "password123");
}

/// Test: duplicate email is a conflict, not a second record
#[test]
fn test_duplicate_signup_conflicts() {
    let (manager, store, _) = create_manager();

    manager
        .signup(&registration("John Doe", "dup@example.com", "password123"))
        .unwrap();
    let first_id = store.find_by_email("dup@example.com").unwrap().unwrap().id;

    let err = manager
        .signup(&registration("Jane Doe", "dup@example.com", "otherpass"))
        .unwrap_err();
    assert!(matches!(err, AuthError::EmailAlreadyExists));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    // The original record is untouched
    let user = store.find_by_email("dup@example.com").unwrap().unwrap();
    assert_eq!(user.id, first_id);
    assert_eq!(user.name, "John Doe");
}

/// Test: blank required fields reject the registration before any record
/// is created
#[test]
fn test_signup_rejects_blank_fields() {
    let (manager, store, notifier) = create_manager();

    for reg in [
        registration("", "blank@example.com", "password123"),
        registration("John Doe", "   ", "password123"),
        registration("John Doe", "blank@example.com", ""),
    ] {
        let err = manager.signup(&reg).unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert!(store.find_by_email("blank@example.com").unwrap().is_none());
    assert!(notifier.verification_token("blank@example.com").is_none());
}

/// Test: a notifier outage does not fail signup
#[test]
fn test_signup_survives_notifier_failure() {
    let (manager, store, notifier) = create_manager();
    notifier.fail_sends();

    let ack = manager
        .signup(&registration("John Doe", "mail@example.com", "password123"))
        .unwrap();
    assert!(ack.status);
    assert!(store.find_by_email("mail@example.com").unwrap().is_some());
}
