//! Storage abstractions for user records

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::InMemoryUserStore;
pub use models::*;
pub use sqlite::SqliteUserStore;

use std::sync::Arc;

use crate::error::AuthError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, AuthError>;

/// Trait for user record storage
///
/// Implementations hash passwords before persisting; raw passwords never
/// reach disk. Emails are unique, compared case-insensitively.
pub trait UserStore: Send + Sync {
    /// Create a new user; fails with `EmailAlreadyExists` on a duplicate
    /// email.
    fn create(&self, new_user: &NewUser) -> StoreResult<User>;

    /// Get a user by ID
    fn find_one(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Get a user by email address
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Apply a partial update; fails with `UserNotFound` if absent.
    fn update(&self, id: UserId, update: UserUpdate) -> StoreResult<User>;

    /// Replace the stored refresh hash only if it still equals `current`.
    ///
    /// The compare-and-swap is serialized per row, so two concurrent
    /// refreshes of the same token cannot both rotate; the loser fails
    /// with `InvalidRefreshToken`.
    fn rotate_refresh_hash(
        &self,
        id: UserId,
        current: Option<&str>,
        next: Option<&str>,
    ) -> StoreResult<User>;

    /// Delete a user
    fn delete(&self, id: UserId) -> StoreResult<()>;
}

/// Allow sharing a store between the session manager and other owners
impl<S: UserStore + ?Sized> UserStore for Arc<S> {
    fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        (**self).create(new_user)
    }

    fn find_one(&self, id: UserId) -> StoreResult<Option<User>> {
        (**self).find_one(id)
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        (**self).find_by_email(email)
    }

    fn update(&self, id: UserId, update: UserUpdate) -> StoreResult<User> {
        (**self).update(id, update)
    }

    fn rotate_refresh_hash(
        &self,
        id: UserId,
        current: Option<&str>,
        next: Option<&str>,
    ) -> StoreResult<User> {
        (**self).rotate_refresh_hash(id, current, next)
    }

    fn delete(&self, id: UserId) -> StoreResult<()> {
        (**self).delete(id)
    }
}
