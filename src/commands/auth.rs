// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{SignupForm, login, signup};
use crate::db::BlobStore;
use crate::format::format_date_long;
use crate::store::Store;
use crate::utils::{optional, required};
use anyhow::Result;
use chrono::Utc;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => {
            let user = login(
                store,
                required(sub, "email")?,
                required(sub, "password")?,
                Utc::now(),
            )?;
            println!("Welcome back, {}!", user.first_name);
        }
        Some(("signup", sub)) => {
            let form = SignupForm {
                first_name: required(sub, "first_name")?.to_string(),
                last_name: optional(sub, "last_name").unwrap_or_default().to_string(),
                email: required(sub, "email")?.to_string(),
                password: required(sub, "password")?.to_string(),
            };
            let user = signup(store, &form, Utc::now())?;
            println!("Account created. Welcome, {}!", user.first_name);
        }
        Some(("logout", _)) => {
            store.logout()?;
            println!("Signed out");
        }
        Some(("whoami", _)) => match store.user()? {
            Some(u) if store.is_authenticated()? => {
                let settings = store.settings()?;
                println!(
                    "{} <{}>, member since {}",
                    u.display_name(),
                    u.email,
                    format_date_long(u.created_at.date_naive(), &settings)
                );
            }
            _ => println!("Not signed in"),
        },
        _ => {}
    }
    Ok(())
}
