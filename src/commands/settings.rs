// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Store;
use crate::utils::{json_flags, maybe_print_json, pretty_table, required};
use anyhow::Result;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let settings = store.settings()?;
            if !maybe_print_json(json_flag, jsonl_flag, &settings)? {
                let rows = settings
                    .entries()
                    .into_iter()
                    .map(|(k, v)| vec![k.to_string(), v])
                    .collect();
                println!("{}", pretty_table(&["Setting", "Value"], rows));
            }
        }
        Some(("set", sub)) => {
            let key = required(sub, "key")?;
            let value = required(sub, "value")?;
            store.set_setting(key, value)?;
            println!("{} = {}", key, value);
        }
        _ => {}
    }
    Ok(())
}
