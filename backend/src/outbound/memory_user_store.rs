//! In-memory implementation of the user store port.
//!
//! Records live behind a single `RwLock`, so every mutation is atomic with
//! respect to concurrent readers and writers. Emails are matched without
//! regard to ASCII case, mirroring a case-insensitive unique index.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::auth::mask_email;
use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{NewUser, User, UserId, UserUpdate};

/// User store backed by a process-local map.
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryUserStore {
    /// Create an empty store that stamps new users with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Insert a fully formed user, keeping its identifier.
    ///
    /// Fails with [`UserStoreError::Conflict`] when the email or the id is
    /// already taken.
    pub async fn insert(&self, user: User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.id()) || email_taken(&users, user.email(), None) {
            return Err(UserStoreError::conflict(user.email()));
        }
        debug!(user_id = %user.id(), "user inserted");
        users.insert(user.id().clone(), user);
        Ok(())
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    /// Whether the store holds no users.
    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: Option<&UserId>) -> bool {
    users
        .values()
        .any(|user| Some(user.id()) != except && user.email().eq_ignore_ascii_case(email))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<(), UserStoreError> {
        if update.is_empty() {
            return if self.users.read().await.contains_key(id) {
                debug!(user_id = %id, "empty update skipped");
                Ok(())
            } else {
                Err(UserStoreError::query(format!("user {id} does not exist")))
            };
        }
        let mut users = self.users.write().await;
        if let Some(email) = update.email.as_deref() {
            if email_taken(&users, email, Some(id)) {
                return Err(UserStoreError::conflict(email));
            }
        }
        let user = users
            .get_mut(id)
            .ok_or_else(|| UserStoreError::query(format!("user {id} does not exist")))?;
        user.apply(&update);
        debug!(user_id = %id, "user updated");
        Ok(())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        if email_taken(&users, &new_user.email, None) {
            return Err(UserStoreError::conflict(new_user.email));
        }
        let NewUser {
            email,
            name,
            hashed_password,
            is_active,
        } = new_user;
        let user = User::builder(UserId::random(), email, self.clock.utc())
            .name(name)
            .hashed_password(hashed_password)
            .active(is_active)
            .build();
        debug!(user_id = %user.id(), email = %mask_email(user.email()), "user created");
        users.insert(user.id().clone(), user.clone());
        Ok(user)
    }
}
