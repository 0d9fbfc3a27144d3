// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::analytics::Period;
use crate::db::BlobStore;
use crate::models::YearMonth;
use crate::store::Store;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.trim().parse::<YearMonth>()?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// A required clap argument, trimmed.
pub fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.try_get_one::<String>(id)
        .ok()
        .flatten()
        .map(|s| s.trim())
        .ok_or_else(|| anyhow!("Missing required argument '{}'", id))
}

/// An optional clap argument, trimmed; empty counts as absent.
pub fn optional<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    m.try_get_one::<String>(id)
        .ok()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Resolves `--period` / `--from` / `--to` into a period; a date range wins.
pub fn period_from_args(m: &clap::ArgMatches) -> Result<Period> {
    match (optional(m, "from"), optional(m, "to")) {
        (Some(from), Some(to)) => {
            let from = parse_date(from)?;
            let to = parse_date(to)?;
            if from > to {
                return Err(anyhow!("--from {} is after --to {}", from, to));
            }
            Ok(Period::Custom { from, to })
        }
        (Some(_), None) | (None, Some(_)) => Err(anyhow!("--from and --to must be given together")),
        (None, None) => optional(m, "period")
            .unwrap_or("current-month")
            .parse::<Period>()
            .map_err(|e| anyhow!(e)),
    }
}

/// Resolves a category given by id (`cat-004`) or by name (case-insensitive).
pub fn id_for_category<B: BlobStore>(store: &Store<B>, key: &str) -> Result<String> {
    let key = key.trim();
    let categories = store.categories()?;
    categories
        .iter()
        .find(|c| c.category_id == key)
        .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(key)))
        .map(|c| c.category_id.clone())
        .with_context(|| format!("Category '{}' not found", key))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn json_flags(m: &clap::ArgMatches) -> (bool, bool) {
    let flag = |id: &str| {
        m.try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    };
    (flag("json"), flag("jsonl"))
}
