use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::{
    auth::{
        dto::Registration,
        password::{spawn_hash, spawn_verify, DUMMY_HASH},
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    error::ApiError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Hashes the password and stores the new user.
pub async fn register_user(store: &dyn UserStore, reg: Registration) -> Result<User, ApiError> {
    // Skip the expensive hash when the answer is already known.
    if store.find_by_email(&reg.email).await?.is_some() {
        return Err(ApiError::AlreadyExists);
    }

    let password_hash = spawn_hash(reg.password).await?;
    store
        .create(NewUser {
            email: reg.email,
            password_hash,
            full_name: reg.full_name,
            phone_number: reg.phone_number,
            birthday: reg.birthday,
        })
        .await
        .map_err(ApiError::from)
}

/// Returns the user only if the email is known and the password matches.
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = store.find_by_email(email).await? else {
        spawn_verify(password.to_owned(), DUMMY_HASH.clone()).await?;
        warn!(email = %email, "login unknown email");
        return Ok(None);
    };

    if !spawn_verify(password.to_owned(), user.password_hash.clone()).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Ok(None);
    }

    debug!(user_id = %user.id, "credentials verified");
    Ok(Some(user))
}
