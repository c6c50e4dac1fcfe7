//! JWT signing and verification
//!
//! One HS256 secret per token class, each falling back to the shared
//! secret, with independently configured expiries. Payloads are a tagged
//! union on the wire; callers match the decoded variant exhaustively, so
//! a token of the wrong class never passes as another even when both
//! classes share a secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AuthError;
use crate::store::{SafeUser, UserId};

/// Token payload variants, distinguished by the `type` tag on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TokenClaims {
    /// Short-lived credential proving identity for API calls
    #[serde(rename = "access")]
    Access {
        sub: String,
        name: String,
        email: String,
        #[serde(rename = "isEmailVerified")]
        is_email_verified: bool,
    },
    /// Longer-lived credential used solely to obtain a new token pair.
    /// `jti` keeps two tokens minted within the same second distinct;
    /// HS256 output is deterministic over its input.
    #[serde(rename = "refresh")]
    Refresh { sub: String, jti: String },
    /// Single-purpose token proving control of an email address
    #[serde(rename = "email-verify")]
    EmailVerify { sub: String },
}

impl TokenClaims {
    /// Subject id carried by any variant
    pub fn subject(&self) -> Result<UserId, AuthError> {
        let sub = match self {
            TokenClaims::Access { sub, .. } => sub,
            TokenClaims::Refresh { sub, .. } => sub,
            TokenClaims::EmailVerify { sub } => sub,
        };
        sub.parse().map_err(|_| AuthError::InvalidTokenType)
    }
}

/// Envelope actually signed: the variant body plus registered claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    body: TokenClaims,
    iat: i64,
    exp: i64,
}

struct TokenClass {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl TokenClass {
    fn new(secret: &str, expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expiry,
        }
    }
}

/// Signs and verifies the three token classes
pub struct TokenService {
    access: TokenClass,
    refresh: TokenClass,
    email_verify: TokenClass,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let refresh_secret = config.refresh_secret.as_deref().unwrap_or(&config.secret);
        let email_secret = config
            .email_verify_secret
            .as_deref()
            .unwrap_or(&config.secret);

        Self {
            access: TokenClass::new(&config.secret, config.access_expiry),
            refresh: TokenClass::new(refresh_secret, config.refresh_expiry),
            email_verify: TokenClass::new(email_secret, config.email_verify_expiry),
        }
    }

    pub fn sign_access(&self, user: &SafeUser) -> Result<String, AuthError> {
        sign(
            &self.access,
            TokenClaims::Access {
                sub: user.id.to_string(),
                name: user.name.clone(),
                email: user.email.clone(),
                is_email_verified: user.is_email_verified,
            },
        )
    }

    pub fn sign_refresh(&self, id: UserId) -> Result<String, AuthError> {
        sign(
            &self.refresh,
            TokenClaims::Refresh {
                sub: id.to_string(),
                jti: Uuid::new_v4().to_string(),
            },
        )
    }

    pub fn sign_email_verify(&self, id: UserId) -> Result<String, AuthError> {
        sign(
            &self.email_verify,
            TokenClaims::EmailVerify {
                sub: id.to_string(),
            },
        )
    }

    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        verify(&self.access, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        verify(&self.refresh, token)
    }

    pub fn verify_email_verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        verify(&self.email_verify, token)
    }
}

fn sign(class: &TokenClass, body: TokenClaims) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        body,
        iat: now.timestamp(),
        exp: (now + class.expiry).timestamp(),
    };
    encode(&Header::default(), &claims, &class.encoding)
        .map_err(|e| AuthError::Internal(e.to_string()))
}

fn verify(class: &TokenClass, token: &str) -> Result<TokenClaims, AuthError> {
    let data = decode::<Claims>(token, &class.decoding, &Validation::default())
        .map_err(|_| AuthError::InvalidToken)?;
    Ok(data.claims.body)
}
