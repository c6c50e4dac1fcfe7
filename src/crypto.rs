//! Password and refresh-token hashing

use sha2::{Digest, Sha256};

/// Default bcrypt cost factor
pub const BCRYPT_COST: u32 = 12;

/// Hash a password with bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, BCRYPT_COST)
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, hash)
}

/// bcrypt reads only the first 72 bytes of its input, and same-user
/// refresh JWTs share a longer common prefix than that. Digest the token
/// first so the stored hash covers the whole string, signature included.
fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash a refresh token for server-side storage
pub fn hash_refresh_token(token: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(token_digest(token), BCRYPT_COST)
}

/// Verify a presented refresh token against the stored hash
pub fn verify_refresh_token(token: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(token_digest(token), hash)
}
