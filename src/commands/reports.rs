// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::analytics::{
    Change, Period, Summary, activity_stats, category_breakdown, category_comparison, insights,
    monthly_trend, period_change, period_transactions, resolve_breakdown, savings_rate, summarize,
    top_spending_drivers, window_transactions,
};
use crate::config::TOP_DRIVERS;
use crate::db::BlobStore;
use crate::format::{
    describe_insight, format_change, format_currency, format_percent, format_signed_currency,
};
use crate::models::{Transaction, TxKind};
use crate::settings::Settings;
use crate::store::Store;
use crate::utils::{json_flags, maybe_print_json, optional, period_from_args, pretty_table, today};
use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle<B: BlobStore>(store: &Store<B>, m: &clap::ArgMatches) -> Result<()> {
    let today = today();
    match m.subcommand() {
        Some(("summary", sub)) => summary(store, sub, today)?,
        Some(("breakdown", sub)) => breakdown(store, sub, today)?,
        Some(("compare", sub)) => compare(store, sub, today)?,
        Some(("trend", sub)) => trend(store, sub, today)?,
        Some(("insights", sub)) => show_insights(store, sub, today)?,
        Some(("drivers", sub)) => drivers(store, sub, today)?,
        Some(("activity", sub)) => {
            let (json_flag, jsonl_flag) = json_flags(sub);
            let stats = activity_stats(&store.transactions()?, &store.budgets()?, today);
            if !maybe_print_json(json_flag, jsonl_flag, &stats)? {
                let settings = store.settings()?;
                let rows = vec![
                    vec![
                        "Total income".to_string(),
                        format_currency(stats.total_income, &settings),
                    ],
                    vec![
                        "Total expenses".to_string(),
                        format_currency(stats.total_expense, &settings),
                    ],
                    vec![
                        "Net savings".to_string(),
                        format_signed_currency(stats.net, &settings),
                    ],
                    vec![
                        "Transactions".to_string(),
                        stats.total_transactions.to_string(),
                    ],
                    vec![
                        "Budgets this month".to_string(),
                        stats.active_budgets.to_string(),
                    ],
                    vec!["Active days".to_string(), stats.active_days.to_string()],
                ];
                println!("{}", pretty_table(&["Metric", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Totals for a period, and for the period it is compared with when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub label: String,
    pub current: Summary,
    pub previous: Option<Summary>,
    pub savings_rate: Decimal,
    /// Change in savings rate, compared as plain numbers.
    pub savings_rate_change: Option<Change>,
    pub income_change: Option<Change>,
    pub expense_change: Option<Change>,
    pub net_change: Option<Change>,
}

pub fn period_report(transactions: &[Transaction], period: &Period, today: NaiveDate) -> PeriodReport {
    let current = summarize(period_transactions(transactions, period, today));
    let previous = period
        .previous_window(today)
        .map(|w| summarize(window_transactions(transactions, &w)));
    let change = |pick: fn(&Summary) -> Decimal, inverse: bool| {
        previous
            .as_ref()
            .and_then(|p| period_change(pick(&current), pick(p), inverse))
    };
    let rate = savings_rate(&current);
    PeriodReport {
        label: period.label(),
        current,
        previous,
        savings_rate: rate,
        savings_rate_change: previous
            .as_ref()
            .and_then(|p| period_change(rate, savings_rate(p), false)),
        income_change: change(|s: &Summary| s.income, false),
        expense_change: change(|s: &Summary| s.expense, true),
        net_change: change(|s: &Summary| s.net, false),
    }
}

fn change_cell(change: Option<&Change>) -> String {
    change.map(format_change).unwrap_or_default()
}

fn summary<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = period_from_args(sub)?;
    let report = period_report(&store.transactions()?, &period, today);
    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let settings = store.settings()?;
    let rows = vec![
        vec![
            "Income".to_string(),
            format_currency(report.current.income, &settings),
            change_cell(report.income_change.as_ref()),
        ],
        vec![
            "Expense".to_string(),
            format_currency(report.current.expense, &settings),
            change_cell(report.expense_change.as_ref()),
        ],
        vec![
            "Net".to_string(),
            format_signed_currency(report.current.net, &settings),
            change_cell(report.net_change.as_ref()),
        ],
        vec![
            "Savings rate".to_string(),
            format_percent(report.savings_rate),
            change_cell(report.savings_rate_change.as_ref()),
        ],
    ];
    println!("{}", report.label);
    println!("{}", pretty_table(&["", "Amount", "vs previous"], rows));
    Ok(())
}

fn breakdown<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = period_from_args(sub)?;
    let kind = optional(sub, "type")
        .unwrap_or("Expense")
        .parse::<TxKind>()
        .map_err(|e| anyhow!(e))?;
    let transactions = store.transactions()?;
    let spend = resolve_breakdown(
        &category_breakdown(period_transactions(&transactions, &period, today), kind),
        &store.categories()?,
    );
    if !maybe_print_json(json_flag, jsonl_flag, &spend)? {
        let settings = store.settings()?;
        let rows = spend
            .iter()
            .map(|s| {
                vec![
                    s.name.clone(),
                    format_currency(s.amount, &settings),
                    format_percent(s.share),
                ]
            })
            .collect();
        println!("{} by category, {}", kind, period.label());
        println!("{}", pretty_table(&["Category", "Amount", "Share"], rows));
    }
    Ok(())
}

fn compare<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = optional(sub, "period")
        .unwrap_or("current-month")
        .parse::<Period>()
        .map_err(|e| anyhow!(e))?;
    let previous = period
        .previous_window(today)
        .ok_or_else(|| anyhow!("{} has no previous period to compare with", period.label()))?;
    let transactions = store.transactions()?;
    let current = category_breakdown(period_transactions(&transactions, &period, today), TxKind::Expense);
    let before = category_breakdown(window_transactions(&transactions, &previous), TxKind::Expense);
    let rows = category_comparison(&current, &before, &store.categories()?);
    if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        let settings = store.settings()?;
        let table = rows
            .iter()
            .map(|r| {
                let sign = if r.percent_change > Decimal::ZERO { "+" } else { "" };
                vec![
                    r.name.clone(),
                    format_currency(r.current, &settings),
                    format_currency(r.previous, &settings),
                    format_signed_currency(r.change, &settings),
                    format!("{}{}", sign, format_percent(r.percent_change)),
                ]
            })
            .collect();
        println!("{} vs previous", period.label());
        println!(
            "{}",
            pretty_table(&["Category", "Current", "Previous", "Change", "%"], table)
        );
    }
    Ok(())
}

fn trend<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| today.year());
    let months = monthly_trend(&store.transactions()?, year);
    if !maybe_print_json(json_flag, jsonl_flag, &months)? {
        let settings = store.settings()?;
        let rows = months
            .iter()
            .map(|mt| {
                vec![
                    mt.month.first_day().format("%b").to_string(),
                    format_currency(mt.income, &settings),
                    format_currency(mt.expense, &settings),
                    format_signed_currency(mt.net, &settings),
                ]
            })
            .collect();
        println!("{}", year);
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], rows));
    }
    Ok(())
}

fn drivers<B: BlobStore>(store: &Store<B>, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = period_from_args(sub)?;
    let transactions = store.transactions()?;
    let expenses = resolve_breakdown(
        &category_breakdown(period_transactions(&transactions, &period, today), TxKind::Expense),
        &store.categories()?,
    );
    let top = top_spending_drivers(&expenses, TOP_DRIVERS);
    if maybe_print_json(json_flag, jsonl_flag, &top)? {
        return Ok(());
    }
    if top.is_empty() {
        println!("No expense data for {}", period.label());
        return Ok(());
    }
    let settings = store.settings()?;
    let rows = top
        .iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                format!("#{}", i + 1),
                s.name.clone(),
                format_currency(s.amount, &settings),
                format_percent(s.share),
            ]
        })
        .collect();
    println!("Top spending drivers, {}", period.label());
    println!(
        "{}",
        pretty_table(&["Rank", "Category", "Amount", "Share of top"], rows)
    );
    Ok(())
}

fn show_insights<B: BlobStore>(
    store: &Store<B>,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<()> {
    let (json_flag, jsonl_flag) = json_flags(sub);
    let period = period_from_args(sub)?;
    let transactions = store.transactions()?;
    let report = period_report(&transactions, &period, today);
    let expenses = resolve_breakdown(
        &category_breakdown(period_transactions(&transactions, &period, today), TxKind::Expense),
        &store.categories()?,
    );
    let found = insights(&report.current, report.previous.as_ref(), &expenses);
    if !maybe_print_json(json_flag, jsonl_flag, &found)? {
        print_insights(&period, &found, &store.settings()?);
    }
    Ok(())
}

fn print_insights(period: &Period, found: &[crate::analytics::Insight], settings: &Settings) {
    let rows = found
        .iter()
        .map(|i| {
            vec![
                format!("{:?}", i.tone()).to_lowercase(),
                describe_insight(i, settings),
            ]
        })
        .collect();
    println!("{}", period.label());
    println!("{}", pretty_table(&["Tone", "Insight"], rows));
}
