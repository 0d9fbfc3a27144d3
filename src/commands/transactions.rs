// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{TransactionFilter, paginate};
use crate::config::{DEFAULT_PAGE_SIZE, UNKNOWN_CATEGORY};
use crate::db::BlobStore;
use crate::format::{format_currency, format_date_long};
use crate::models::{PaymentSource, TransactionDraft, TransactionPatch, TxKind};
use crate::store::Store;
use crate::utils::{
    id_for_category, json_flags, maybe_print_json, optional, parse_date, parse_decimal,
    pretty_table, required, today,
};
use anyhow::{Result, anyhow};
use serde::Serialize;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("show", sub)) => show(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.remove_transaction(id)?;
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_kind(s: &str) -> Result<TxKind> {
    s.parse::<TxKind>().map_err(|e| anyhow!(e))
}

fn parse_payment(s: &str) -> Result<PaymentSource> {
    s.parse::<PaymentSource>().map_err(|e| anyhow!(e))
}

fn add<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches) -> Result<()> {
    let date = match optional(sub, "date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let draft = TransactionDraft {
        date,
        amount: parse_decimal(required(sub, "amount")?)?,
        kind: parse_kind(required(sub, "type")?)?,
        category_id: id_for_category(store, required(sub, "category")?)?,
        description: required(sub, "description")?.to_string(),
        payment_source: optional(sub, "payment")
            .map(parse_payment)
            .transpose()?
            .unwrap_or_default(),
        is_recurring: sub.get_flag("recurring"),
    };
    let t = store.add_transaction(draft)?;
    let settings = store.settings()?;
    println!(
        "Recorded {} {} on {} ({}) as {}",
        t.kind,
        format_currency(t.amount, &settings),
        format_date_long(t.date, &settings),
        t.description,
        t.transaction_id
    );
    Ok(())
}

fn edit<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches) -> Result<()> {
    let id = required(sub, "id")?;
    let patch = TransactionPatch {
        date: optional(sub, "date").map(parse_date).transpose()?,
        amount: optional(sub, "amount").map(parse_decimal).transpose()?,
        kind: optional(sub, "type").map(parse_kind).transpose()?,
        category_id: optional(sub, "category")
            .map(|c| id_for_category(store, c))
            .transpose()?,
        description: optional(sub, "description").map(str::to_string),
        payment_source: optional(sub, "payment").map(parse_payment).transpose()?,
        is_recurring: sub.get_one::<bool>("recurring").copied(),
    };
    match store.update_transaction(id, patch)? {
        Some(t) => println!("Updated transaction {}", t.transaction_id),
        None => println!("No transaction with id {}", id),
    }
    Ok(())
}

fn show<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let id = required(sub, "id")?;
    let Some(t) = store.transaction(id)? else {
        println!("No transaction with id {}", id);
        return Ok(());
    };
    if !maybe_print_json(json_flag, jsonl_flag, &t)? {
        let settings = store.settings()?;
        let rows = vec![
            vec!["ID".to_string(), t.transaction_id.clone()],
            vec!["Date".to_string(), format_date_long(t.date, &settings)],
            vec!["Type".to_string(), t.kind.to_string()],
            vec!["Amount".to_string(), format_currency(t.amount, &settings)],
            vec!["Category".to_string(), store.category_name(&t.category_id)?],
            vec!["Description".to_string(), t.description.clone()],
            vec!["Payment".to_string(), t.payment_source.to_string()],
            vec!["Recurring".to_string(), t.is_recurring.to_string()],
        ];
        println!("{}", pretty_table(&["Field", "Value"], rows));
    }
    Ok(())
}

fn list<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let listing = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &listing.rows)? {
        let rows: Vec<Vec<String>> = listing
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.payment_source.clone(),
                    if r.is_recurring { "yes".into() } else { String::new() },
                    r.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date",
                    "Type",
                    "Category",
                    "Description",
                    "Amount",
                    "Payment",
                    "Recurring",
                    "ID"
                ],
                rows,
            )
        );
        println!(
            "Page {} of {} ({} matching) | income {} | expense {}",
            listing.page,
            listing.total_pages,
            listing.total_items,
            listing.income,
            listing.expense
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub payment_source: String,
    pub is_recurring: bool,
}

pub struct Listing {
    pub rows: Vec<TransactionRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Totals over every match, not just this page.
    pub income: String,
    pub expense: String,
}

pub fn query_rows<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches) -> Result<Listing> {
    let categories = store.categories()?;
    let settings = store.settings()?;
    let filter = TransactionFilter {
        search: optional(sub, "search").map(str::to_string),
        kind: optional(sub, "type").map(parse_kind).transpose()?,
        category_id: optional(sub, "category")
            .map(|c| id_for_category(store, c))
            .transpose()?,
        from: optional(sub, "from").map(parse_date).transpose()?,
        to: optional(sub, "to").map(parse_date).transpose()?,
    };
    let all = store.transactions()?;
    let matched = filter.apply(&all, &categories);
    let summary = crate::analytics::summarize(matched.iter().copied());

    let per_page = if sub.get_flag("all") {
        matched.len().max(1)
    } else {
        sub.get_one::<usize>("per_page")
            .copied()
            .unwrap_or(DEFAULT_PAGE_SIZE)
    };
    let page_no = sub.get_one::<usize>("page").copied().unwrap_or(1);
    let page = paginate(&matched, page_no, per_page);

    let rows = page
        .items
        .iter()
        .map(|t| TransactionRow {
            id: t.transaction_id.clone(),
            date: format_date_long(t.date, &settings),
            kind: t.kind.to_string(),
            category: categories
                .iter()
                .find(|c| c.category_id == t.category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            description: t.description.clone(),
            amount: format_currency(t.amount, &settings),
            payment_source: t.payment_source.to_string(),
            is_recurring: t.is_recurring,
        })
        .collect();

    Ok(Listing {
        rows,
        page: page.page,
        total_pages: page.total_pages,
        total_items: page.total_items,
        income: format_currency(summary.income, &settings),
        expense: format_currency(summary.expense, &settings),
    })
}
