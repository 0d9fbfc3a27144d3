// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display strings for amounts, dates and report values.
//!
//! Every function takes the [`Settings`] to render with; nothing here reads
//! storage.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::analytics::{Change, Direction, Insight, Remaining, Utilization};
use crate::models::YearMonth;
use crate::settings::{Currency, DateFormat, Settings, TimeFormat};

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

struct NumberStyle {
    group_sep: &'static str,
    decimal_sep: &'static str,
    /// en-IN groups the lowest three digits, then pairs.
    lakh_grouping: bool,
}

fn number_style(currency: Currency) -> NumberStyle {
    match currency.locale() {
        "en-IN" => NumberStyle {
            group_sep: ",",
            decimal_sep: ".",
            lakh_grouping: true,
        },
        "de-DE" => NumberStyle {
            group_sep: ".",
            decimal_sep: ",",
            lakh_grouping: false,
        },
        _ => NumberStyle {
            group_sep: ",",
            decimal_sep: ".",
            lakh_grouping: false,
        },
    }
}

fn group_digits(digits: &str, style: &NumberStyle) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    let mut width = 3;
    while end > 0 {
        let start = end.saturating_sub(width);
        groups.push(chars[start..end].iter().collect());
        end = start;
        if style.lakh_grouping {
            width = 2;
        }
    }
    groups.reverse();
    groups.join(style.group_sep)
}

/// Renders the magnitude of `amount` with the currency symbol, e.g. `₹1,23,456.50`.
///
/// The sign is dropped; callers word negative values themselves ("Over by ...").
pub fn format_currency(amount: Decimal, settings: &Settings) -> String {
    let currency = settings.currency;
    let dp = currency.fraction_digits();
    let mut rounded = amount
        .abs()
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let style = number_style(currency);
    let mut out = format!("{}{}", currency.symbol(), group_digits(int_part, &style));
    if let Some(f) = frac_part {
        out.push_str(style.decimal_sep);
        out.push_str(f);
    }
    out
}

/// Like [`format_currency`] but keeps a leading minus for negative amounts.
pub fn format_signed_currency(amount: Decimal, settings: &Settings) -> String {
    let body = format_currency(amount, settings);
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-{}", body)
    } else {
        body
    }
}

pub fn format_date(date: NaiveDate, settings: &Settings) -> String {
    let (d, m, y) = (date.day(), date.month(), date.year());
    match settings.date_format {
        DateFormat::DayMonthYear => format!("{:02}/{:02}/{}", d, m, y),
        DateFormat::MonthDayYear => format!("{:02}/{:02}/{}", m, d, y),
        DateFormat::Iso => format!("{}-{:02}-{:02}", y, m, d),
    }
}

/// Date with an abbreviated month name, e.g. `30 Dec 2025`.
pub fn format_date_long(date: NaiveDate, settings: &Settings) -> String {
    let (d, y) = (date.day(), date.year());
    let m = MONTH_ABBR[date.month0() as usize];
    match settings.date_format {
        DateFormat::DayMonthYear => format!("{} {} {}", d, m, y),
        DateFormat::MonthDayYear => format!("{} {}, {}", m, d, y),
        DateFormat::Iso => format!("{} {} {}", y, m, d),
    }
}

pub fn format_time(time: NaiveTime, settings: &Settings) -> String {
    let (h, min) = (time.hour(), time.minute());
    match settings.time_format {
        TimeFormat::TwelveHour => {
            let suffix = if h >= 12 { "PM" } else { "AM" };
            let h12 = match h % 12 {
                0 => 12,
                other => other,
            };
            format!("{}:{:02} {}", h12, min, suffix)
        }
        TimeFormat::TwentyFourHour => format!("{:02}:{:02}", h, min),
    }
}

pub fn format_datetime(dt: NaiveDateTime, settings: &Settings) -> String {
    format!(
        "{} {}",
        format_date(dt.date(), settings),
        format_time(dt.time(), settings)
    )
}

/// `January 2026`.
pub fn format_month(month: YearMonth) -> String {
    month.first_day().format("%B %Y").to_string()
}

/// One decimal place, e.g. `12.5%`.
pub fn format_percent(p: Decimal) -> String {
    let mut r = p.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(1);
    format!("{}%", r)
}

/// Arrow plus magnitude, e.g. `↑ 12.5%`.
pub fn format_change(change: &Change) -> String {
    let arrow = match change.direction {
        Direction::Up => "↑",
        Direction::Down => "↓",
        Direction::Flat => "−",
    };
    format!("{} {}", arrow, format_percent(change.percent_magnitude))
}

/// `₹50.00 left`, `Limit reached`, or `Over by ₹50.00`.
pub fn describe_remaining(u: &Utilization, settings: &Settings) -> String {
    match u.remaining_state() {
        Remaining::Left(v) => format!("{} left", format_currency(v, settings)),
        Remaining::Reached => "Limit reached".to_string(),
        Remaining::Over(v) => format!("Over by {}", format_currency(v, settings)),
    }
}

/// Percentage used, as whole percent, e.g. `79% used`.
pub fn describe_usage(u: &Utilization) -> String {
    format!(
        "{}% used",
        u.percentage
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .normalize()
    )
}

pub fn describe_insight(insight: &Insight, settings: &Settings) -> String {
    match insight {
        Insight::SpendingUp { percent } => format!(
            "Your spending increased by {} compared to last month.",
            format_percent(*percent)
        ),
        Insight::SpendingDown { percent } => format!(
            "Great job! Your spending decreased by {} compared to last month.",
            format_percent(*percent)
        ),
        Insight::SpendingSteady { percent } => format!(
            "Your spending is stable, with only {} change from last month.",
            format_percent(*percent)
        ),
        Insight::TopCategory {
            name,
            amount,
            share,
        } => format!(
            "{} is your highest expense category at {} ({} of total).",
            name,
            format_currency(*amount, settings),
            format_percent(*share)
        ),
        Insight::SavingsExcellent { rate } => format!(
            "Excellent savings rate of {}! You're on track to meet your financial goals.",
            format_percent(*rate)
        ),
        Insight::SavingsGood { rate } => format!(
            "Good savings rate of {}. Consider increasing it to 30% for better financial health.",
            format_percent(*rate)
        ),
        Insight::SavingsLow { rate } => format!(
            "Low savings rate of {}. Try to reduce discretionary spending to save more.",
            format_percent(*rate)
        ),
        Insight::Overspending => "You're spending more than you earn. Review your expenses and create a budget plan.".to_string(),
        Insight::IncomeUp { percent } => format!(
            "Your income increased by {} this period. Great work!",
            format_percent(*percent)
        ),
        Insight::IncomeDown { percent } => format!(
            "Your income decreased by {}. Consider diversifying income sources.",
            format_percent(*percent)
        ),
    }
}
