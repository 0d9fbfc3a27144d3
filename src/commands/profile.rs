// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::format::format_date_long;
use crate::models::{User, UserPatch};
use crate::settings::Settings;
use crate::store::Store;
use crate::utils::{json_flags, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    let signed_in = store.is_authenticated()?;
    match m.subcommand() {
        Some(("show", sub)) => match store.user()? {
            Some(user) if signed_in => {
                let (json_flag, jsonl_flag) = json_flags(sub);
                if !maybe_print_json(json_flag, jsonl_flag, &user)? {
                    print_profile(&user, &store.settings()?);
                }
            }
            _ => println!("Not signed in"),
        },
        Some(("edit", sub)) => {
            if !signed_in {
                println!("Not signed in");
                return Ok(());
            }
            match store.update_user(patch_from_args(sub)?)? {
                Some(user) => println!("Profile updated for {}", user.display_name()),
                None => println!("Not signed in"),
            }
        }
        _ => {}
    }
    Ok(())
}

/// Unlike `utils::optional`, an empty value is kept: it clears the field.
fn given(m: &clap::ArgMatches, id: &str) -> Option<String> {
    m.try_get_one::<String>(id).ok().flatten().cloned()
}

pub fn patch_from_args(m: &clap::ArgMatches) -> Result<UserPatch> {
    let date_of_birth = match given(m, "dob") {
        Some(s) if s.trim().is_empty() => Some(None),
        Some(s) => Some(Some(parse_date(&s)?)),
        None => None,
    };
    Ok(UserPatch {
        full_name: given(m, "full_name"),
        phone: given(m, "phone"),
        date_of_birth,
        location: given(m, "location"),
        occupation: given(m, "occupation"),
    })
}

fn print_profile(user: &User, settings: &Settings) {
    let p = &user.profile;
    let rows = vec![
        vec!["Name".to_string(), user.display_name()],
        vec!["Email".to_string(), user.email.clone()],
        vec!["Phone".to_string(), p.phone.clone()],
        vec![
            "Date of birth".to_string(),
            p.date_of_birth
                .map(|d| format_date_long(d, settings))
                .unwrap_or_default(),
        ],
        vec!["Location".to_string(), p.location.clone()],
        vec!["Occupation".to_string(), p.occupation.clone()],
        vec![
            "Member since".to_string(),
            format_date_long(user.created_at.date_naive(), settings),
        ],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
}
