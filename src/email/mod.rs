//! Email sending abstractions

pub mod console;
pub mod smtp;

pub use console::ConsoleNotifier;
pub use smtp::{SmtpConfig, SmtpNotifier};

use crate::error::AuthError;

pub const APP_NAME: &str = "EventHub";

/// Trait for sending account emails
///
/// Delivery failures come back as [`AuthError::Mail`]. Both sends are
/// fire-and-forget from the session manager's perspective: a failure is
/// logged, never propagated into the signup/login result.
pub trait Notifier: Send + Sync {
    /// Send the verification link for a freshly registered account
    fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), AuthError>;

    /// Send a welcome-back note after a successful login
    fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), AuthError>;
}

/// Allow using Box<dyn Notifier> as a Notifier
impl Notifier for Box<dyn Notifier> {
    fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), AuthError> {
        (**self).send_verification_email(to, name, token, base_url)
    }

    fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), AuthError> {
        (**self).send_welcome_email(to, name)
    }
}

/// Verification link embedded in the email body
pub fn verification_url(base_url: &str, token: &str) -> String {
    format!(
        "{}/auth/verify-email?token={}",
        base_url.trim_end_matches('/'),
        token
    )
}
