use std::collections::{hash_map::Entry, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    AlreadyExists,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Storage for user records, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, assigning its id and creation time.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Process-local store; contents are lost on restart.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        match users.entry(new_user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists),
            Entry::Vacant(slot) => {
                let user = User {
                    id: Uuid::new_v4(),
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    full_name: new_user.full_name,
                    phone_number: new_user.phone_number,
                    birthday: new_user.birthday,
                    created_at: OffsetDateTime::now_utc(),
                };
                Ok(slot.insert(user).clone())
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().get(email).cloned())
    }
}
