//! Common test utilities for session lifecycle tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use eventhub_auth::{
    AuthError, InMemoryUserStore, JwtConfig, NewUser, Notifier, SessionManager, TokenService,
};

pub const BASE_URL: &str = "http://localhost:3000";

/// What a notifier call captured
#[derive(Debug, Clone)]
pub enum SentMail {
    Verification { to: String, token: String },
    Welcome { to: String },
}

/// Mock notifier that captures outgoing mail
#[derive(Default, Clone)]
pub struct MockNotifier {
    pub sent: Arc<RwLock<Vec<SentMail>>>,
    fail: Arc<AtomicBool>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn fail_sends(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Get the last verification token sent to an email
    pub fn verification_token(&self, email: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find_map(|mail| match mail {
                SentMail::Verification { to, token } if to == email => Some(token.clone()),
                _ => None,
            })
    }

    pub fn welcome_count(&self, email: &str) -> usize {
        self.sent
            .read()
            .unwrap()
            .iter()
            .filter(|mail| matches!(mail, SentMail::Welcome { to } if to == email))
            .count()
    }
}

impl Notifier for MockNotifier {
    fn send_verification_email(
        &self,
        to: &str,
        _name: &str,
        token: &str,
        _base_url: &str,
    ) -> Result<(), AuthError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AuthError::Mail("smtp unavailable".to_string()));
        }
        self.sent.write().unwrap().push(SentMail::Verification {
            to: to.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    fn send_welcome_email(&self, to: &str, _name: &str) -> Result<(), AuthError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AuthError::Mail("smtp unavailable".to_string()));
        }
        self.sent
            .write()
            .unwrap()
            .push(SentMail::Welcome { to: to.to_string() });
        Ok(())
    }
}

pub type TestManager = SessionManager<Arc<InMemoryUserStore>, MockNotifier>;

/// Create a session manager over an in-memory store and mock notifier,
/// with the store and notifier handles kept for inspection
pub fn create_manager() -> (TestManager, Arc<InMemoryUserStore>, MockNotifier) {
    let store = Arc::new(InMemoryUserStore::new());
    let notifier = MockNotifier::new();
    let tokens = TokenService::new(&JwtConfig::with_secret("test-secret"));

    let manager = SessionManager::new(store.clone(), tokens, notifier.clone(), BASE_URL);
    (manager, store, notifier)
}

pub fn registration(name: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Sign up and complete email verification; returns the verified account
pub fn create_verified_user(
    manager: &TestManager,
    notifier: &MockNotifier,
    email: &str,
    password: &str,
) {
    let ack = manager
        .signup(&registration("John Doe", email, password))
        .expect("signup failed");
    assert!(ack.status);

    let token = notifier
        .verification_token(email)
        .expect("no verification email sent");
    let ack = manager.verify_email(&token).expect("verification failed");
    assert!(ack.status);
}
