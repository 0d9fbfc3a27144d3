// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::models::TxKind;
use crate::store::Store;
use crate::utils::{json_flags, maybe_print_json, optional, pretty_table};
use anyhow::{Result, anyhow};

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let (json_flag, jsonl_flag) = json_flags(sub);
        let kind = optional(sub, "type")
            .map(|s| s.parse::<TxKind>().map_err(|e| anyhow!(e)))
            .transpose()?;
        let categories: Vec<_> = store
            .categories()?
            .into_iter()
            .filter(|c| kind.is_none_or(|k| c.kind == k))
            .collect();
        if !maybe_print_json(json_flag, jsonl_flag, &categories)? {
            let rows = categories
                .iter()
                .map(|c| {
                    vec![
                        c.category_id.clone(),
                        c.name.clone(),
                        c.kind.to_string(),
                        c.icon.clone(),
                    ]
                })
                .collect();
            println!("{}", pretty_table(&["ID", "Name", "Type", "Icon"], rows));
        }
    }
    Ok(())
}
