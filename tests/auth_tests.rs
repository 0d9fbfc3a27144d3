// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::Utc;
use finora::auth::{SignupForm, login, signup, validate_email};
use finora::db::MemoryBlobStore;
use finora::error::ValidationError;
use finora::store::Store;

#[test]
fn email_shape() {
    assert!(validate_email("a@b.co").is_ok());
    assert!(validate_email("no-at.example.com").is_err());
    assert!(validate_email("a b@c.de").is_err());
    assert!(validate_email("a@nodot").is_err());
}

#[test]
fn login_derives_name_and_sets_session() {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    let user = login(&store, " priya@example.com ", "secret1", Utc::now()).unwrap();
    assert_eq!(user.first_name, "priya");
    assert!(user.user_id.starts_with("user-"));
    assert!(store.is_authenticated().unwrap());
    assert_eq!(store.user().unwrap(), Some(user));
}

#[test]
fn short_password_is_declined() {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    let err = login(&store, "a@b.co", "12345", Utc::now()).unwrap_err();
    assert_eq!(
        err.declined(),
        Some(&ValidationError::PasswordTooShort { min: 6 })
    );
    assert!(!store.is_authenticated().unwrap());
}

#[test]
fn signup_requires_first_name_and_logout_clears() {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    let mut form = SignupForm {
        first_name: "  ".into(),
        last_name: "Rao".into(),
        email: "sam@example.com".into(),
        password: "longenough".into(),
    };
    let err = signup(&store, &form, Utc::now()).unwrap_err();
    assert_eq!(err.declined(), Some(&ValidationError::MissingField("First name")));

    form.first_name = "Sam".into();
    let user = signup(&store, &form, Utc::now()).unwrap();
    assert_eq!(user.last_name, "Rao");

    store.logout().unwrap();
    assert!(store.user().unwrap().is_none());
    assert!(!store.is_authenticated().unwrap());
}
