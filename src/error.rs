//! Error types for the authentication core

use thiserror::Error;

/// Failure classes surfaced to the caller.
///
/// The host application maps these onto its transport (HTTP status codes,
/// RPC error codes); the session manager only decides the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; no state change.
    Validation,
    /// User or referenced entity absent.
    NotFound,
    /// Duplicate email.
    Conflict,
    /// Bad credentials or an unverifiable token.
    Unauthorized,
    /// Authenticated but not allowed: unverified email, terminated or
    /// stale session.
    Forbidden,
    /// A collaborator (mailer) is unavailable.
    Upstream,
    Internal,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    EmailNotVerified,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid token type")]
    InvalidTokenType,

    #[error("No active session")]
    NoActiveSession,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing configuration: {0}")]
    Config(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailAlreadyExists => ErrorKind::Conflict,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::EmailNotVerified => ErrorKind::Forbidden,
            AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::InvalidTokenType => ErrorKind::Unauthorized,
            AuthError::NoActiveSession => ErrorKind::Forbidden,
            AuthError::InvalidRefreshToken => ErrorKind::Forbidden,
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Config(_) => ErrorKind::Internal,
            AuthError::Mail(_) => ErrorKind::Upstream,
            AuthError::Internal(_) => ErrorKind::Internal,
        }
    }
}
