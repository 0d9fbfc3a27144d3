// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use crate::db::BlobStore;
use crate::models::{Budget, Category, Transaction, TxKind};
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle<B: BlobStore>(store: &Store<B>) -> Result<()> {
    let mut issues: Vec<(&'static str, String)> = store
        .unreadable_entries()?
        .into_iter()
        .map(|(key, detail)| ("unreadable_value", format!("{}: {}", key, detail)))
        .collect();
    issues.extend(diagnose(
        &store.transactions()?,
        &store.budgets()?,
        &store.categories()?,
    ));
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(k, d)| vec![k.to_string(), d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Inconsistencies that reads tolerate but writes would reject.
pub fn diagnose(
    transactions: &[Transaction],
    budgets: &[Budget],
    categories: &[Category],
) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    let find = |id: &str| categories.iter().find(|c| c.category_id == id);

    if categories.is_empty() {
        rows.push(("empty_catalog", "no categories stored".to_string()));
    }

    for t in transactions {
        if t.amount <= Decimal::ZERO {
            rows.push(("non_positive_amount", format!("{} {}", t.transaction_id, t.amount)));
        }
        match find(&t.category_id) {
            None => rows.push((
                "txn_unknown_category",
                format!("{} -> {}", t.transaction_id, t.category_id),
            )),
            Some(c) if c.kind != t.kind => rows.push((
                "txn_type_mismatch",
                format!("{} is {} but '{}' is {}", t.transaction_id, t.kind, c.name, c.kind),
            )),
            Some(_) => {}
        }
    }

    let mut seen = HashSet::new();
    for b in budgets {
        if b.limit_amount <= Decimal::ZERO {
            rows.push(("non_positive_limit", format!("{} {}", b.budget_id, b.limit_amount)));
        }
        match find(&b.category_id) {
            None => rows.push((
                "budget_unknown_category",
                format!("{} -> {}", b.budget_id, b.category_id),
            )),
            Some(c) if c.kind != TxKind::Expense => rows.push((
                "budget_not_expense",
                format!("{} on '{}'", b.budget_id, c.name),
            )),
            Some(_) => {}
        }
        if !seen.insert((b.category_id.as_str(), b.month_year)) {
            rows.push((
                "duplicate_budget",
                format!("{} {} {}", b.budget_id, b.category_id, b.month_year),
            ));
        }
    }
    rows
}
