// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveTime};
use finora::analytics::{Insight, period_change};
use finora::format::{
    describe_insight, format_change, format_currency, format_date, format_date_long,
    format_datetime, format_month, format_percent, format_signed_currency, format_time,
};
use finora::models::YearMonth;
use finora::settings::{Currency, DateFormat, Settings, TimeFormat};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn with_currency(currency: Currency) -> Settings {
    Settings {
        currency,
        ..Default::default()
    }
}

#[test]
fn default_currency_is_rupees() {
    let s = Settings::default();
    assert_eq!(format_currency(dec("1234.5"), &s), "₹1,234.50");
    assert_eq!(format_currency(dec("1234567.891"), &s), "₹12,34,567.89");
    assert_eq!(format_currency(Decimal::ZERO, &s), "₹0.00");
}

#[test]
fn per_currency_rules() {
    assert_eq!(format_currency(dec("1234.5"), &with_currency(Currency::Jpy)), "¥1,235");
    assert_eq!(format_currency(dec("1234.5"), &with_currency(Currency::Eur)), "€1.234,50");
    assert_eq!(
        format_currency(dec("1234567.5"), &with_currency(Currency::Usd)),
        "$1,234,567.50"
    );
    assert_eq!(format_currency(dec("999"), &with_currency(Currency::Gbp)), "£999.00");
}

#[test]
fn half_cents_round_away_from_zero() {
    let s = with_currency(Currency::Usd);
    assert_eq!(format_currency(dec("2.345"), &s), "$2.35");
    assert_eq!(format_currency(dec("0.005"), &s), "$0.01");
}

#[test]
fn sign_handling() {
    let s = with_currency(Currency::Usd);
    assert_eq!(format_currency(dec("-50"), &s), "$50.00");
    assert_eq!(format_signed_currency(dec("-50"), &s), "-$50.00");
    assert_eq!(format_signed_currency(dec("50"), &s), "$50.00");
}

#[test]
fn dates_follow_preference() {
    let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
    let mut s = Settings::default();
    assert_eq!(format_date(date, &s), "05/01/2025");
    assert_eq!(format_date_long(date, &s), "5 Jan 2025");
    s.date_format = DateFormat::MonthDayYear;
    assert_eq!(format_date(date, &s), "01/05/2025");
    assert_eq!(format_date_long(date, &s), "Jan 5, 2025");
    s.date_format = DateFormat::Iso;
    assert_eq!(format_date(date, &s), "2025-01-05");
    assert_eq!(format_date_long(date, &s), "2025 Jan 5");
}

#[test]
fn times_follow_preference() {
    let mut s = Settings::default();
    let midnight = NaiveTime::from_hms_opt(0, 5, 0).unwrap();
    let afternoon = NaiveTime::from_hms_opt(13, 30, 0).unwrap();
    assert_eq!(format_time(midnight, &s), "12:05 AM");
    assert_eq!(format_time(afternoon, &s), "1:30 PM");
    s.time_format = TimeFormat::TwentyFourHour;
    assert_eq!(format_time(afternoon, &s), "13:30");
    let dt = NaiveDate::from_ymd_opt(2025, 1, 5)
        .unwrap()
        .and_time(afternoon);
    assert_eq!(format_datetime(dt, &s), "05/01/2025 13:30");
}

#[test]
fn months_and_percentages() {
    assert_eq!(format_month(YearMonth::new(2026, 1).unwrap()), "January 2026");
    assert_eq!(format_percent(dec("12.345")), "12.3%");
    assert_eq!(format_percent(dec("5")), "5.0%");
    let up = period_change(dec("112.5"), dec("100"), false).unwrap();
    assert_eq!(format_change(&up), "↑ 12.5%");
    let flat = period_change(dec("100"), dec("100"), false).unwrap();
    assert_eq!(format_change(&flat), "− 0.0%");
}

#[test]
fn insight_text_uses_settings_currency() {
    let s = with_currency(Currency::Usd);
    let top = Insight::TopCategory {
        name: "Rent".into(),
        amount: dec("900"),
        share: dec("60"),
    };
    assert_eq!(
        describe_insight(&top, &s),
        "Rent is your highest expense category at $900.00 (60.0% of total)."
    );
    assert_eq!(
        describe_insight(&Insight::SpendingUp { percent: dec("12.5") }, &s),
        "Your spending increased by 12.5% compared to last month."
    );
}
