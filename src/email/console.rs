//! Console-based notifier for development

use super::{verification_url, Notifier};
use crate::error::AuthError;

/// Notifier that logs to the console (for development)
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ConsoleNotifier {
    fn send_verification_email(
        &self,
        to: &str,
        name: &str,
        token: &str,
        base_url: &str,
    ) -> Result<(), AuthError> {
        let url = verification_url(base_url, token);

        println!();
        println!("========================================");
        println!("  VERIFICATION LINK FOR: {} <{}>", name, to);
        println!("  {}", url);
        println!("========================================");
        println!();

        tracing::info!(email = %to, "Verification email sent");

        Ok(())
    }

    fn send_welcome_email(&self, to: &str, name: &str) -> Result<(), AuthError> {
        println!();
        println!("========================================");
        println!("  WELCOME EMAIL FOR: {} <{}>", name, to);
        println!("========================================");
        println!();

        tracing::info!(email = %to, "Welcome email sent");

        Ok(())
    }
}
