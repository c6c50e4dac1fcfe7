//! EventHub authentication core
//!
//! Owns the signup -> email verification -> login -> refresh -> logout
//! lifecycle: token issuance and rotation, refresh-hash bookkeeping, and
//! the verification-email flow. The HTTP surface, DTO validation and the
//! event/favorites features of the wider application live elsewhere; this
//! crate exposes the session manager plus concrete user-store and
//! notifier implementations to wire it up with.

pub mod config;
pub mod crypto;
pub mod email;
pub mod error;
pub mod session;
pub mod store;
pub mod token;

pub use config::{Config, JwtConfig};
pub use email::{ConsoleNotifier, Notifier, SmtpConfig, SmtpNotifier};
pub use error::{AuthError, ErrorKind};
pub use session::{Ack, SessionManager, Tokens};
pub use store::{
    InMemoryUserStore, NewUser, SafeUser, SqliteUserStore, User, UserId, UserStore, UserUpdate,
};
pub use token::{TokenClaims, TokenService};
