//! Configuration read from the process environment
//!
//! All secrets and expiries are carried in explicit structs injected at
//! construction; nothing in the crate reads the environment after startup.

use chrono::Duration;

use crate::email::SmtpConfig;
use crate::error::AuthError;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL embedded in verification links.
    pub base_url: String,

    pub jwt: JwtConfig,

    /// SMTP settings; None means the console notifier is used.
    pub smtp: Option<SmtpConfig>,
}

impl Config {
    /// Load from the environment.
    ///
    /// `JWT_SECRET` is required. The base URL falls back through
    /// `FRONTEND_URL`, then `API_BASE_URL`, then localhost.
    pub fn from_env() -> Result<Self, AuthError> {
        let base_url = get_env("FRONTEND_URL")
            .or_else(|| get_env("API_BASE_URL"))
            .unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Self {
            base_url,
            jwt: JwtConfig::from_env()?,
            smtp: SmtpConfig::from_env(),
        })
    }
}

/// Signing secrets and expiries, one set per token class.
///
/// The refresh and email-verification classes fall back to the shared
/// secret when no dedicated one is configured.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_expiry: Duration,
    pub refresh_secret: Option<String>,
    pub refresh_expiry: Duration,
    pub email_verify_secret: Option<String>,
    pub email_verify_expiry: Duration,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, AuthError> {
        let secret =
            get_env("JWT_SECRET").ok_or_else(|| AuthError::Config("JWT_SECRET".to_string()))?;

        Ok(Self {
            secret,
            access_expiry: expiry_from_env("JWT_EXPIRES_IN", Duration::minutes(30))?,
            refresh_secret: get_env("REFRESH_JWT_SECRET"),
            refresh_expiry: expiry_from_env("REFRESH_EXPIRES_IN", Duration::days(2))?,
            email_verify_secret: get_env("EMAIL_VERIFY_SECRET"),
            email_verify_expiry: expiry_from_env("EMAIL_VERIFY_EXPIRES_IN", Duration::hours(1))?,
        })
    }

    /// Shared-secret config with the default expiries.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_expiry: Duration::minutes(30),
            refresh_secret: None,
            refresh_expiry: Duration::days(2),
            email_verify_secret: None,
            email_verify_expiry: Duration::hours(1),
        }
    }
}

/// Get a non-empty environment variable.
fn get_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn expiry_from_env(key: &str, default: Duration) -> Result<Duration, AuthError> {
    match get_env(key) {
        Some(raw) => parse_expiry(&raw)
            .ok_or_else(|| AuthError::Config(format!("{key}: unparseable expiry {raw:?}"))),
        None => Ok(default),
    }
}

/// Parse an expiry string: `30m`, `2d`, `1h`, `90s`, or plain seconds.
pub fn parse_expiry(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(secs) = raw.parse::<i64>() {
        return Some(Duration::seconds(secs));
    }

    let unit = raw.chars().last()?;
    let value: i64 = raw[..raw.len() - unit.len_utf8()].trim().parse().ok()?;
    match unit {
        's' => Some(Duration::seconds(value)),
        'm' => Some(Duration::minutes(value)),
        'h' => Some(Duration::hours(value)),
        'd' => Some(Duration::days(value)),
        _ => None,
    }
}
