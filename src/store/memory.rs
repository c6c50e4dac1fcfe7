//! In-memory user store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::{NewUser, StoreResult, User, UserId, UserStore, UserUpdate};
use crate::crypto::hash_password;
use crate::error::AuthError;

/// In-memory user store for development and tests
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_update(user: &mut User, update: UserUpdate) {
    if let Some(name) = update.name {
        user.name = name;
    }
    if let Some(verified) = update.is_email_verified {
        user.is_email_verified = verified;
    }
    if let Some(hash) = update.refresh_token_hash {
        user.refresh_token_hash = hash;
    }
}

impl UserStore for InMemoryUserStore {
    fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let normalized = new_user.email.to_lowercase();

        // Hash outside the lock; bcrypt is deliberately slow
        let password_hash =
            hash_password(&new_user.password).map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == normalized) {
            return Err(AuthError::EmailAlreadyExists);
        }

        let user = User {
            id: UserId::new(),
            name: new_user.name.clone(),
            email: normalized,
            password_hash,
            is_email_verified: false,
            refresh_token_hash: None,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_one(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == normalized).cloned())
    }

    fn update(&self, id: UserId, update: UserUpdate) -> StoreResult<User> {
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;
        apply_update(user, update);
        Ok(user.clone())
    }

    fn rotate_refresh_hash(
        &self,
        id: UserId,
        current: Option<&str>,
        next: Option<&str>,
    ) -> StoreResult<User> {
        // Compare-and-swap under the write lock
        let mut users = self.users.write().unwrap();
        let user = users.get_mut(&id).ok_or(AuthError::UserNotFound)?;
        if user.refresh_token_hash.as_deref() != current {
            return Err(AuthError::InvalidRefreshToken);
        }
        user.refresh_token_hash = next.map(str::to_string);
        Ok(user.clone())
    }

    fn delete(&self, id: UserId) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        users.remove(&id).ok_or(AuthError::UserNotFound)?;
        Ok(())
    }
}
