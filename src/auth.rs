// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Simulated sign-in. Credentials are checked for shape only and the password
//! is never stored.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::config::{MIN_PASSWORD_LEN, USER_ID_PREFIX};
use crate::db::BlobStore;
use crate::error::{StoreResult, ValidationError};
use crate::models::{Profile, User};
use crate::store::{Store, new_id};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Signs in as `email`. The first name is taken from the address's local part.
pub fn login<B: BlobStore>(
    store: &Store<B>,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> StoreResult<User> {
    let email = email.trim();
    validate_email(email)?;
    validate_password(password)?;
    let first_name = email.split('@').next().unwrap_or_default().to_string();
    let user = User {
        user_id: new_id(USER_ID_PREFIX),
        email: email.to_string(),
        first_name,
        last_name: String::new(),
        created_at: now,
        profile: Profile::default(),
    };
    start_session(store, user)
}

pub fn signup<B: BlobStore>(
    store: &Store<B>,
    form: &SignupForm,
    now: DateTime<Utc>,
) -> StoreResult<User> {
    let first_name = form.first_name.trim();
    if first_name.is_empty() {
        return Err(ValidationError::MissingField("First name").into());
    }
    let email = form.email.trim();
    validate_email(email)?;
    validate_password(&form.password)?;
    let user = User {
        user_id: new_id(USER_ID_PREFIX),
        email: email.to_string(),
        first_name: first_name.to_string(),
        last_name: form.last_name.trim().to_string(),
        created_at: now,
        profile: Profile::default(),
    };
    start_session(store, user)
}

fn start_session<B: BlobStore>(store: &Store<B>, user: User) -> StoreResult<User> {
    store.set_user(&user)?;
    store.set_authenticated(true)?;
    info!(user_id = %user.user_id, "signed in");
    Ok(user)
}
