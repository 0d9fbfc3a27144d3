// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{BudgetOverview, BudgetStatus, budget_overview};
use crate::db::BlobStore;
use crate::format::{describe_remaining, describe_usage, format_currency, format_month};
use crate::models::{BudgetDraft, BudgetPatch, YearMonth};
use crate::settings::Settings;
use crate::store::Store;
use crate::utils::{
    id_for_category, json_flags, maybe_print_json, optional, parse_decimal, parse_month,
    pretty_table, required, today,
};
use anyhow::Result;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let draft = BudgetDraft {
                category_id: id_for_category(store, required(sub, "category")?)?,
                month_year: month_arg(sub)?,
                limit_amount: parse_decimal(required(sub, "limit")?)?,
            };
            let b = store.add_budget(draft)?;
            let settings = store.settings()?;
            println!(
                "Budget {} set: {} for {} in {}",
                b.budget_id,
                format_currency(b.limit_amount, &settings),
                store.category_name(&b.category_id)?,
                format_month(b.month_year)
            );
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let patch = BudgetPatch {
                category_id: optional(sub, "category")
                    .map(|c| id_for_category(store, c))
                    .transpose()?,
                month_year: optional(sub, "month").map(parse_month).transpose()?,
                limit_amount: optional(sub, "limit").map(parse_decimal).transpose()?,
            };
            match store.update_budget(id, patch)? {
                Some(b) => println!("Updated budget {}", b.budget_id),
                None => println!("No budget with id {}", id),
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.remove_budget(id)?;
            println!("Removed budget {}", id);
        }
        Some(("list", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let month = optional(sub, "month").map(parse_month).transpose()?;
            let budgets: Vec<_> = store
                .budgets()?
                .into_iter()
                .filter(|b| month.is_none_or(|m| b.month_year == m))
                .collect();
            if !maybe_print_json(json_flag, jsonl_flag, &budgets)? {
                let settings = store.settings()?;
                let mut rows = Vec::new();
                for b in &budgets {
                    rows.push(vec![
                        b.month_year.to_string(),
                        store.category_name(&b.category_id)?,
                        format_currency(b.limit_amount, &settings),
                        b.budget_id.clone(),
                    ]);
                }
                println!("{}", pretty_table(&["Month", "Category", "Limit", "ID"], rows));
            }
        }
        Some(("status", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let overview = overview_for(store, month_arg(sub)?)?;
            if !maybe_print_json(json_flag, jsonl_flag, &overview)? {
                print_overview(&overview, &store.settings()?);
            }
        }
        _ => {}
    }
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<YearMonth> {
    Ok(match optional(sub, "month") {
        Some(m) => parse_month(m)?,
        None => YearMonth::of(today()),
    })
}

pub fn overview_for<B: BlobStore>(store: &Store<B>, month: YearMonth) -> Result<BudgetOverview> {
    Ok(budget_overview(
        &store.budgets()?,
        &store.transactions()?,
        &store.categories()?,
        month,
    ))
}

fn print_overview(overview: &BudgetOverview, settings: &Settings) {
    if overview.lines.is_empty() {
        println!("No budgets set for {}", format_month(overview.month));
        return;
    }
    let rows: Vec<Vec<String>> = overview
        .lines
        .iter()
        .map(|l| {
            let u = &l.utilization;
            let flag = match u.status {
                BudgetStatus::Safe => "",
                BudgetStatus::Warning => " ⚠",
                BudgetStatus::OverBudget => " ✖",
            };
            vec![
                l.category_name.clone(),
                format_currency(u.limit, settings),
                format_currency(u.spent, settings),
                describe_usage(u),
                describe_remaining(u, settings),
                format!("{}{}", u.status.as_str(), flag),
            ]
        })
        .collect();
    println!("{}", format_month(overview.month));
    println!(
        "{}",
        pretty_table(
            &["Category", "Limit", "Spent", "Used", "Remaining", "Status"],
            rows
        )
    );
    println!(
        "Total budget {} | spent {} | remaining {}",
        format_currency(overview.total_limit, settings),
        format_currency(overview.total_spent, settings),
        crate::format::format_signed_currency(overview.total_remaining, settings)
    );
}
