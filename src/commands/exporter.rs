// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use crate::config::UNKNOWN_CATEGORY;
use crate::db::BlobStore;
use crate::store::Store;
use crate::utils::required;
use anyhow::{Result, bail};
use chrono::Utc;
use serde_json::json;
use tracing::info;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = required(sub, "format")?.to_lowercase();
            let out = required(sub, "out")?;
            let n = export_transactions(store, &fmt, Path::new(out))?;
            println!("Exported {} transactions to {}", n, out);
        }
        Some(("all", sub)) => {
            let out = required(sub, "out")?;
            export_all(store, Path::new(out))?;
            println!("Exported all data to {}", out);
        }
        _ => {}
    }
    Ok(())
}

/// Writes every transaction, newest first, with category names resolved.
pub fn export_transactions<B: BlobStore>(store: &Store<B>, fmt: &str, out: &Path) -> Result<usize> {
    let categories = store.categories()?;
    let transactions = store.transactions()?;
    let name_of = |id: &str| {
        categories
            .iter()
            .find(|c| c.category_id == id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
    };

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "type",
                "category",
                "description",
                "amount",
                "paymentSource",
                "isRecurring",
                "transactionId",
            ])?;
            for t in &transactions {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.to_string(),
                    name_of(&t.category_id),
                    t.description.clone(),
                    t.amount.to_string(),
                    t.payment_source.to_string(),
                    t.is_recurring.to_string(),
                    t.transaction_id.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = transactions
                .iter()
                .map(|t| {
                    json!({
                        "transactionId": t.transaction_id,
                        "date": t.date,
                        "type": t.kind,
                        "category": name_of(&t.category_id),
                        "categoryId": t.category_id,
                        "description": t.description,
                        "amount": t.amount,
                        "paymentSource": t.payment_source,
                        "isRecurring": t.is_recurring,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    info!(count = transactions.len(), path = %out.display(), "exported transactions");
    Ok(transactions.len())
}

/// Writes the whole store as one JSON document.
pub fn export_all<B: BlobStore>(store: &Store<B>, out: &Path) -> Result<()> {
    let snapshot = store.snapshot(Utc::now())?;
    std::fs::write(out, serde_json::to_string_pretty(&snapshot)?)?;
    info!(path = %out.display(), "exported snapshot");
    Ok(())
}
