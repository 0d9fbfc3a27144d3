// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::BlobStore;
use crate::store::Store;
use anyhow::{Result, bail};

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    if !m.get_flag("yes") {
        bail!("Refusing to reset without --yes");
    }
    if m.get_flag("all") {
        store.wipe()?;
        println!("All data removed; categories will be re-seeded on next run");
    } else {
        store.clear_financial_data()?;
        println!("Transactions and budgets cleared");
    }
    Ok(())
}
