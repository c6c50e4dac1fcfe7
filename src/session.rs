//! Session lifecycle: signup, verification, login, refresh, logout
//!
//! All durable state lives in the user store; every operation runs to
//! completion within one call and holds no cross-call state. At most one
//! refresh token is valid per user at any time: its hash is written at
//! login and on every successful refresh (rotation) and cleared on
//! logout.

use serde::Serialize;

use crate::crypto::{hash_refresh_token, verify_password, verify_refresh_token};
use crate::email::Notifier;
use crate::error::AuthError;
use crate::store::{NewUser, SafeUser, UserId, UserStore, UserUpdate};
use crate::token::{TokenClaims, TokenService};

/// Raw token pair returned to the caller. Only a hash of the refresh
/// token is ever stored server-side.
#[derive(Debug, Clone, Serialize)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Acknowledgment shape for signup/logout/verification outcomes
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub status: bool,
    pub message: String,
}

impl Ack {
    fn ok(message: &str) -> Self {
        Self {
            status: true,
            message: message.to_string(),
        }
    }
}

/// How `issue_tokens` writes the new refresh hash
enum Rotation<'a> {
    /// Overwrite whatever is stored (login, signup completion)
    Replace,
    /// Only rotate if the stored hash is still `current` (refresh);
    /// a concurrent rotation in between fails the swap
    IfCurrent(&'a str),
}

/// Owns the signup/verify/login/refresh/logout state transitions
pub struct SessionManager<U, N> {
    users: U,
    tokens: TokenService,
    notifier: N,
    base_url: String,
}

impl<U: UserStore, N: Notifier> SessionManager<U, N> {
    pub fn new(users: U, tokens: TokenService, notifier: N, base_url: impl Into<String>) -> Self {
        Self {
            users,
            tokens,
            notifier,
            base_url: base_url.into(),
        }
    }

    /// Register a new account and send the verification email.
    ///
    /// Does not log the user in; no access or refresh tokens are issued
    /// until the email is verified and the user logs in.
    pub fn signup(&self, registration: &NewUser) -> Result<Ack, AuthError> {
        registration.require_fields()?;

        let user = self.users.create(registration)?;
        tracing::info!(user_id = %user.id, "User registered");

        let token = self.tokens.sign_email_verify(user.id)?;
        if let Err(e) =
            self.notifier
                .send_verification_email(&user.email, &user.name, &token, &self.base_url)
        {
            tracing::warn!(user_id = %user.id, error = %e, "Verification email could not be sent");
        }

        Ok(Ack::ok(
            "User created successfully, please verify your email",
        ))
    }

    /// Check credentials and the verified-email precondition.
    ///
    /// Wrong email and wrong password are indistinguishable to the
    /// caller; an unverified account fails with its own error after the
    /// password has been checked.
    pub fn validate_user(&self, email: &str, password: &str) -> Result<SafeUser, AuthError> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;

        let ok = verify_password(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !ok {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        Ok(user.to_safe_view())
    }

    /// Validate credentials, then log in
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Tokens, AuthError> {
        let user = self.validate_user(email, password)?;
        self.login(&user)
    }

    /// Issue a token pair for an already-validated user
    pub fn login(&self, user: &SafeUser) -> Result<Tokens, AuthError> {
        if let Err(e) = self.notifier.send_welcome_email(&user.email, &user.name) {
            tracing::warn!(user_id = %user.id, error = %e, "Welcome email could not be sent");
        }

        self.issue_tokens(user, Rotation::Replace)
    }

    /// Exchange a refresh token for a fresh pair, rotating the stored
    /// hash. The presented token is invalid afterwards.
    pub fn refresh(&self, refresh_token: &str) -> Result<Tokens, AuthError> {
        let id = match self.tokens.verify_refresh(refresh_token)? {
            claims @ TokenClaims::Refresh { .. } => claims.subject()?,
            _ => return Err(AuthError::InvalidTokenType),
        };

        let user = self.users.find_one(id)?.ok_or(AuthError::UserNotFound)?;
        let current = user
            .refresh_token_hash
            .as_deref()
            .ok_or(AuthError::NoActiveSession)?;

        let ok = verify_refresh_token(refresh_token, current)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !ok {
            // Stale or replayed token; the stored hash stays as it is
            return Err(AuthError::InvalidRefreshToken);
        }

        self.issue_tokens(&user.to_safe_view(), Rotation::IfCurrent(current))
    }

    /// Terminate the active session, invalidating any outstanding
    /// refresh token
    pub fn logout(&self, id: UserId) -> Result<Ack, AuthError> {
        self.users.update(
            id,
            UserUpdate {
                refresh_token_hash: Some(None),
                ..Default::default()
            },
        )?;
        tracing::info!(user_id = %id, "Session terminated");

        Ok(Ack::ok("Logged out successfully"))
    }

    /// Mark the account's email as verified.
    ///
    /// Re-verifying an already-verified account is a no-op that reports
    /// success.
    pub fn verify_email(&self, token: &str) -> Result<Ack, AuthError> {
        let id = match self.tokens.verify_email_verify(token)? {
            claims @ TokenClaims::EmailVerify { .. } => claims.subject()?,
            _ => return Err(AuthError::InvalidTokenType),
        };

        let user = self.users.find_one(id)?.ok_or(AuthError::UserNotFound)?;
        if user.is_email_verified {
            return Ok(Ack::ok("Email already verified"));
        }

        self.users.update(
            id,
            UserUpdate {
                is_email_verified: Some(true),
                ..Default::default()
            },
        )?;
        tracing::info!(user_id = %id, "Email verified");

        Ok(Ack::ok("Email verified successfully"))
    }

    /// Fetch a user record with credential material stripped
    pub fn get_profile(&self, id: UserId) -> Result<SafeUser, AuthError> {
        let user = self.users.find_one(id)?.ok_or(AuthError::UserNotFound)?;
        Ok(user.to_safe_view())
    }

    /// Sign an access/refresh pair and persist the new refresh hash
    fn issue_tokens(&self, user: &SafeUser, rotation: Rotation<'_>) -> Result<Tokens, AuthError> {
        let access_token = self.tokens.sign_access(user)?;
        let refresh_token = self.tokens.sign_refresh(user.id)?;

        let hash =
            hash_refresh_token(&refresh_token).map_err(|e| AuthError::Internal(e.to_string()))?;

        match rotation {
            Rotation::Replace => {
                self.users.update(
                    user.id,
                    UserUpdate {
                        refresh_token_hash: Some(Some(hash)),
                        ..Default::default()
                    },
                )?;
            }
            Rotation::IfCurrent(current) => {
                self.users
                    .rotate_refresh_hash(user.id, Some(current), Some(&hash))?;
            }
        }

        Ok(Tokens {
            access_token,
            refresh_token,
        })
    }
}
