// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use finora::analytics::{Direction, Outcome, Period};
use finora::auth::login;
use finora::cli;
use finora::commands::{profile, reports};
use finora::db::MemoryBlobStore;
use finora::models::{PaymentSource, Transaction, TransactionDraft, TxKind};
use finora::store::Store;
use rust_decimal::Decimal;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn draft(date: &str, amount: i64, kind: TxKind, cat: &str) -> TransactionDraft {
    TransactionDraft {
        date: d(date),
        amount: Decimal::from(amount),
        kind,
        category_id: cat.into(),
        description: "entry".into(),
        payment_source: PaymentSource::Cash,
        is_recurring: false,
    }
}

/// January keeps half its income, February three quarters.
fn two_months() -> Vec<Transaction> {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    for (date, amount, kind, cat) in [
        ("2025-01-01", 2000, TxKind::Income, "cat-001"),
        ("2025-01-10", 1000, TxKind::Expense, "cat-007"),
        ("2025-02-01", 2000, TxKind::Income, "cat-001"),
        ("2025-02-10", 500, TxKind::Expense, "cat-004"),
    ] {
        store.add_transaction(draft(date, amount, kind, cat)).unwrap();
    }
    store.transactions().unwrap()
}

#[test]
fn savings_rate_change_compares_rates() {
    let report = reports::period_report(&two_months(), &Period::CurrentMonth, d("2025-02-15"));
    assert_eq!(report.savings_rate, Decimal::from(75));
    let change = report.savings_rate_change.unwrap();
    assert_eq!(change.direction, Direction::Up);
    assert_eq!(change.outcome, Outcome::Positive);
    assert_eq!(change.percent_magnitude, Decimal::from(50));

    // Last month has nothing before it in this data.
    let report = reports::period_report(&two_months(), &Period::LastMonth, d("2025-02-15"));
    assert!(report.savings_rate_change.is_none());
    let year = reports::period_report(&two_months(), &Period::Year, d("2025-02-15"));
    assert!(year.savings_rate_change.is_none());
}

#[test]
fn report_subcommands_run_on_stored_data() {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    store
        .add_transaction(draft("2025-01-10", 80, TxKind::Expense, "cat-004"))
        .unwrap();
    for args in [
        vec!["finora", "report", "drivers", "--from", "2025-01-01", "--to", "2025-01-31"],
        vec!["finora", "report", "drivers", "--json"],
        vec!["finora", "report", "activity"],
        vec!["finora", "report", "summary", "--jsonl"],
    ] {
        let m = cli::build_cli().get_matches_from(args.clone());
        let (_, sub) = m.subcommand().unwrap();
        reports::handle(&store, sub).unwrap_or_else(|e| panic!("{:?}: {}", args, e));
    }
}

#[test]
fn profile_edit_through_cli() {
    let store = Store::open(MemoryBlobStore::new()).unwrap();
    let run = |args: &[&str]| {
        let mut full = vec!["finora", "profile"];
        full.extend_from_slice(args);
        let m = cli::build_cli().get_matches_from(full);
        let (_, sub) = m.subcommand().unwrap();
        profile::handle(&store, sub).unwrap();
    };

    // Nothing stored yet: the edit is a no-op.
    run(&["edit", "--phone", "123"]);
    assert!(store.user().unwrap().is_none());

    login(&store, "priya@example.com", "secret1", Utc::now()).unwrap();
    run(&[
        "edit",
        "--full-name",
        "Priya Nair",
        "--dob",
        "1992-03-04",
        "--location",
        "Pune, India",
    ]);
    let user = store.user().unwrap().unwrap();
    assert_eq!(user.display_name(), "Priya Nair");
    assert_eq!(user.profile.date_of_birth, Some(d("1992-03-04")));
    assert_eq!(user.profile.location, "Pune, India");
    assert_eq!(user.profile.phone, "");

    run(&["edit", "--dob", "", "--occupation", "Engineer"]);
    let user = store.user().unwrap().unwrap();
    assert_eq!(user.profile.date_of_birth, None);
    assert_eq!(user.profile.occupation, "Engineer");
    assert_eq!(user.profile.location, "Pune, India");
    run(&["show", "--json"]);

    let m = cli::build_cli().get_matches_from(["finora", "profile", "edit", "--dob", "04/03/1992"]);
    let (_, sub) = m.subcommand().unwrap();
    assert!(profile::handle(&store, sub).is_err());
}
